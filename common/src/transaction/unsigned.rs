use super::{
    AuthorizationEntry, ContractTransactionData, InvokeContractOperation, PreparedTransaction,
    TimeBounds, Transaction,
};
use crate::{
    account::Sequence,
    crypto::{Address, Hash},
    network::Network,
    serializer::*,
};

// First snapshot of an invocation: built from a fresh account state,
// no resources and no authorization yet
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnsignedTransaction {
    tx: Transaction,
}

impl UnsignedTransaction {
    pub fn new(
        source: Address,
        fee: u32,
        sequence: Sequence,
        time_bounds: TimeBounds,
        operation: InvokeContractOperation,
    ) -> Self {
        Self {
            tx: Transaction {
                source,
                fee,
                sequence,
                time_bounds,
                operation,
                contract_data: None,
            },
        }
    }

    pub fn transaction(&self) -> &Transaction {
        &self.tx
    }

    pub fn hash(&self, network: &Network) -> Hash {
        self.tx.hash(network)
    }

    // Merge the simulated resources into a new snapshot.
    // `self` is left untouched so it stays usable if a later stage fails.
    pub fn prepare(
        &self,
        contract_data: ContractTransactionData,
        auth: Vec<AuthorizationEntry>,
        fee: u32,
    ) -> PreparedTransaction {
        PreparedTransaction::new(Transaction {
            fee,
            operation: self.tx.operation.with_auth(auth),
            contract_data: Some(contract_data),
            ..self.tx.clone()
        })
    }
}

impl Serializer for UnsignedTransaction {
    fn write(&self, writer: &mut Writer) {
        self.tx.write(writer);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        let tx = Transaction::read(reader)?;
        if tx.contract_data.is_some() {
            return Err(ReaderError::InvalidValue);
        }
        Ok(Self { tx })
    }

    fn size(&self) -> usize {
        self.tx.size()
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{contract_data, unsigned};
    use super::*;

    #[test]
    fn test_prepare_keeps_previous_snapshot() {
        let tx = unsigned();
        let before = tx.clone();
        let prepared = tx.prepare(contract_data(), vec![AuthorizationEntry::new(vec![7])], 5_100);

        assert_eq!(tx, before);
        assert!(tx.transaction().contract_data().is_none());
        assert_eq!(prepared.transaction().fee(), 5_100);
        assert_eq!(prepared.transaction().sequence(), tx.transaction().sequence());
        assert_eq!(prepared.transaction().operation().auth().len(), 1);
        assert_ne!(prepared.hash(&Network::Testnet), tx.hash(&Network::Testnet));
    }

    #[test]
    fn test_unsigned_rejects_resources() {
        let prepared = unsigned().prepare(contract_data(), vec![], 200);
        assert_eq!(
            UnsignedTransaction::from_bytes(&prepared.to_bytes()),
            Err(ReaderError::InvalidValue)
        );
    }
}
