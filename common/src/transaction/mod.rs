mod prepared;
mod resources;
mod signed;
mod unsigned;

use crate::{
    account::Sequence,
    config::ENVELOPE_TYPE_TX,
    contract::ScValue,
    crypto::{hash_parts, Address, ContractId, Hash},
    network::Network,
    serializer::*,
};

pub use prepared::PreparedTransaction;
pub use resources::*;
pub use signed::{DecoratedSignature, SignedTransaction, MAX_SIGNATURE_SIZE};
pub use unsigned::UnsignedTransaction;

// Validity window of a transaction, in seconds since the Unix epoch.
// A `max_time` of zero would mean open ended, which the ledger refuses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeBounds {
    pub min_time: u64,
    pub max_time: u64,
}

impl TimeBounds {
    pub fn new(min_time: u64, max_time: u64) -> Self {
        Self { min_time, max_time }
    }

    // Window starting now and lasting `timeout` seconds
    pub fn with_timeout(now: u64, timeout: u64) -> Self {
        Self::new(0, now.saturating_add(timeout))
    }

    pub fn is_expired(&self, now: u64) -> bool {
        self.max_time != 0 && now >= self.max_time
    }
}

impl Serializer for TimeBounds {
    fn write(&self, writer: &mut Writer) {
        writer.write_u64(&self.min_time);
        writer.write_u64(&self.max_time);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        let min_time = reader.read_u64()?;
        let max_time = reader.read_u64()?;
        if max_time == 0 || min_time > max_time {
            return Err(ReaderError::InvalidValue);
        }
        Ok(Self { min_time, max_time })
    }

    fn size(&self) -> usize {
        16
    }
}

/// The single operation carried by every transaction built here:
/// a call of `function` on `contract` with ordered `args`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvokeContractOperation {
    contract: ContractId,
    function: String,
    args: Vec<ScValue>,
    auth: Vec<AuthorizationEntry>,
}

impl InvokeContractOperation {
    pub fn new(contract: ContractId, function: String, args: Vec<ScValue>) -> Self {
        Self {
            contract,
            function,
            args,
            auth: Vec::new(),
        }
    }

    pub fn contract(&self) -> &ContractId {
        &self.contract
    }

    pub fn function(&self) -> &str {
        &self.function
    }

    pub fn args(&self) -> &[ScValue] {
        &self.args
    }

    pub fn auth(&self) -> &[AuthorizationEntry] {
        &self.auth
    }

    fn with_auth(&self, auth: Vec<AuthorizationEntry>) -> Self {
        Self {
            auth,
            ..self.clone()
        }
    }
}

impl Serializer for InvokeContractOperation {
    fn write(&self, writer: &mut Writer) {
        self.contract.write(writer);
        writer.write_string(&self.function);
        self.args.write(writer);
        self.auth.write(writer);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        let contract = ContractId::read(reader)?;
        let function = reader.read_string()?;
        crate::codec::validate_function_name(&function).map_err(|_| ReaderError::InvalidValue)?;
        let args = Vec::read(reader)?;
        let auth = Vec::read(reader)?;
        Ok(Self {
            contract,
            function,
            args,
            auth,
        })
    }

    fn size(&self) -> usize {
        self.contract.size()
            + 2
            + self.function.len()
            + self.args.size()
            + self.auth.size()
    }
}

// Transaction body shared by every snapshot.
// Signatures are never part of it, so its hash is stable across signing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    source: Address,
    fee: u32,
    sequence: Sequence,
    time_bounds: TimeBounds,
    operation: InvokeContractOperation,
    contract_data: Option<ContractTransactionData>,
}

impl Transaction {
    pub fn source(&self) -> &Address {
        &self.source
    }

    pub fn fee(&self) -> u32 {
        self.fee
    }

    pub fn sequence(&self) -> Sequence {
        self.sequence
    }

    pub fn time_bounds(&self) -> &TimeBounds {
        &self.time_bounds
    }

    pub fn operation(&self) -> &InvokeContractOperation {
        &self.operation
    }

    pub fn contract_data(&self) -> Option<&ContractTransactionData> {
        self.contract_data.as_ref()
    }

    // Identifier of the transaction on `network`
    pub fn hash(&self, network: &Network) -> Hash {
        hash_parts(&[
            network.network_id().as_bytes(),
            &ENVELOPE_TYPE_TX.to_be_bytes(),
            &self.to_bytes(),
        ])
    }
}

impl Serializer for Transaction {
    fn write(&self, writer: &mut Writer) {
        self.source.write(writer);
        writer.write_u32(&self.fee);
        writer.write_i64(&self.sequence);
        self.time_bounds.write(writer);
        self.operation.write(writer);
        self.contract_data.write(writer);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        let source = Address::read(reader)?;
        if source.is_contract() {
            return Err(ReaderError::InvalidValue);
        }

        let fee = reader.read_u32()?;
        let sequence = reader.read_i64()?;
        let time_bounds = TimeBounds::read(reader)?;
        let operation = InvokeContractOperation::read(reader)?;
        let contract_data = Option::read(reader)?;

        Ok(Self {
            source,
            fee,
            sequence,
            time_bounds,
            operation,
            contract_data,
        })
    }

    fn size(&self) -> usize {
        self.source.size()
            + 4
            + 8
            + self.time_bounds.size()
            + self.operation.size()
            + self.contract_data.size()
    }
}
