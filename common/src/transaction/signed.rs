use super::{PreparedTransaction, Transaction};
use crate::{crypto::Hash, network::Network, serializer::*};

// Largest signature accepted from a signing agent
pub const MAX_SIGNATURE_SIZE: usize = 64;

// Signature with the last 4 bytes of the signer public key as a hint
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecoratedSignature {
    pub hint: [u8; 4],
    pub signature: Vec<u8>,
}

impl Serializer for DecoratedSignature {
    fn write(&self, writer: &mut Writer) {
        writer.write_bytes(&self.hint);
        debug_assert!(self.signature.len() <= MAX_SIGNATURE_SIZE);
        writer.write_u8(self.signature.len() as u8);
        writer.write_bytes(&self.signature);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        let hint = reader.read_bytes::<4>()?;
        let len = reader.read_u8()? as usize;
        if len == 0 || len > MAX_SIGNATURE_SIZE {
            return Err(ReaderError::InvalidSize);
        }
        let signature = reader.read_bytes_ref(len)?.to_vec();
        Ok(Self { hint, signature })
    }

    fn size(&self) -> usize {
        4 + 1 + self.signature.len()
    }
}

// Final snapshot, produced only by the signing agent
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedTransaction {
    tx: Transaction,
    signatures: Vec<DecoratedSignature>,
}

impl SignedTransaction {
    pub fn new(prepared: &PreparedTransaction, signatures: Vec<DecoratedSignature>) -> Self {
        Self {
            tx: prepared.transaction().clone(),
            signatures,
        }
    }

    pub fn transaction(&self) -> &Transaction {
        &self.tx
    }

    pub fn signatures(&self) -> &[DecoratedSignature] {
        &self.signatures
    }

    // Same as the prepared transaction hash: signatures are excluded
    pub fn hash(&self, network: &Network) -> Hash {
        self.tx.hash(network)
    }

    // Check that this envelope wraps exactly `prepared`
    pub fn wraps(&self, prepared: &PreparedTransaction) -> bool {
        &self.tx == prepared.transaction()
    }
}

impl Serializer for SignedTransaction {
    fn write(&self, writer: &mut Writer) {
        self.tx.write(writer);
        self.signatures.write(writer);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        let tx = Transaction::read(reader)?;
        let signatures = Vec::read(reader)?;
        Ok(Self { tx, signatures })
    }

    fn size(&self) -> usize {
        self.tx.size() + self.signatures.size()
    }
}
