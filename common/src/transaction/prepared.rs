use super::Transaction;
use crate::{crypto::Hash, network::Network, serializer::*};

// Snapshot with resources, resource fee and authorization merged:
// the exact bytes handed to the signing agent
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreparedTransaction {
    tx: Transaction,
}

impl PreparedTransaction {
    pub(super) fn new(tx: Transaction) -> Self {
        Self { tx }
    }

    pub fn transaction(&self) -> &Transaction {
        &self.tx
    }

    pub fn hash(&self, network: &Network) -> Hash {
        self.tx.hash(network)
    }
}

impl Serializer for PreparedTransaction {
    fn write(&self, writer: &mut Writer) {
        self.tx.write(writer);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        let tx = Transaction::read(reader)?;
        if tx.contract_data.is_none() {
            return Err(ReaderError::InvalidValue);
        }
        Ok(Self { tx })
    }

    fn size(&self) -> usize {
        self.tx.size()
    }
}
