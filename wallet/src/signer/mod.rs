mod adapter;
mod probe;
mod rpc_agent;

use async_trait::async_trait;
use thiserror::Error;
use tickets_common::crypto::Address;

pub use adapter::sign;
pub use probe::{SignerProbe, SignerState};
pub use rpc_agent::RpcSigningAgent;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AgentError {
    // Absent or unreachable, both mean nothing can be signed
    #[error("signing agent unavailable: {}", _0)]
    Unavailable(String),
    #[error("request declined by the user: {}", _0)]
    Declined(String),
    #[error("malformed agent response: {}", _0)]
    Protocol(String),
}

/// External, user controlled component holding the key material.
///
/// The pipeline only ever hands it opaque canonical transaction bytes
/// and receives opaque signed bytes back.
#[async_trait]
pub trait SigningAgent: Send + Sync {
    // Is an agent present and answering
    async fn is_connected(&self) -> Result<bool, AgentError>;

    // Ask the user to grant access, returns the address access was granted for
    async fn request_access(&self) -> Result<Address, AgentError>;

    // Active address, `None` while access has not been granted
    async fn get_address(&self) -> Result<Option<Address>, AgentError>;

    async fn sign_transaction(
        &self,
        transaction: &[u8],
        network_passphrase: &str,
        signer: &Address,
    ) -> Result<Vec<u8>, AgentError>;
}
