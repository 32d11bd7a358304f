use crate::{codec::EncodingError, crypto::Address};
use serde::{Deserialize, Serialize};

// Sequence counter of an account, single use per transaction
pub type Sequence = i64;

/// On-chain state of the invoking account.
/// Fetched fresh before every build and never cached across invocations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountState {
    address: Address,
    sequence: Sequence,
}

impl AccountState {
    pub fn new(address: Address, sequence: Sequence) -> Self {
        Self { address, sequence }
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn sequence(&self) -> Sequence {
        self.sequence
    }

    // Sequence the next transaction of this account must carry
    pub fn next_sequence(&self) -> Result<Sequence, EncodingError> {
        self.sequence
            .checked_add(1)
            .ok_or(EncodingError::SequenceOverflow(self.sequence))
    }
}
