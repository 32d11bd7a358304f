use super::{AgentError, SigningAgent};
use async_trait::async_trait;
use log::trace;
use std::borrow::Cow;
use tickets_common::{
    api::{
        AddressResult, IsConnectedResult, SignTransactionParams, SignTransactionResult,
        AGENT_USER_DECLINED_CODE,
    },
    crypto::Address,
    rpc::{JsonRPCClient, JsonRPCError},
};

// Signing agent reached through a local JSON-RPC endpoint
pub struct RpcSigningAgent {
    // State queries answered by the agent itself
    client: JsonRPCClient,
    // Requests waiting on the user: no answer deadline, only cancellation ends them
    interactive: JsonRPCClient,
}

impl RpcSigningAgent {
    pub fn new<S: Into<String>>(address: S) -> Result<Self, AgentError> {
        let address = address.into();
        let client = JsonRPCClient::new(address.as_str()).map_err(map_error)?;
        let interactive = JsonRPCClient::with_options(address, None).map_err(map_error)?;
        Ok(Self {
            client,
            interactive,
        })
    }

    pub fn target(&self) -> &str {
        self.client.target()
    }
}

fn map_error(error: JsonRPCError) -> AgentError {
    match error {
        JsonRPCError::Transport(e) => AgentError::Unavailable(e),
        JsonRPCError::HttpStatus(status) => AgentError::Unavailable(format!("HTTP {}", status)),
        // Reachable but silent: the agent is still there
        JsonRPCError::Timeout(e) => AgentError::Protocol(format!("no answer: {}", e)),
        JsonRPCError::ServerError { code, message, .. } if code == AGENT_USER_DECLINED_CODE => {
            AgentError::Declined(message)
        }
        e => AgentError::Protocol(e.to_string()),
    }
}

#[async_trait]
impl SigningAgent for RpcSigningAgent {
    async fn is_connected(&self) -> Result<bool, AgentError> {
        if log::log_enabled!(log::Level::Trace) {
            trace!("is_connected");
        }
        let result: IsConnectedResult = self.client.call("isConnected").await.map_err(map_error)?;
        Ok(result.is_connected)
    }

    async fn request_access(&self) -> Result<Address, AgentError> {
        if log::log_enabled!(log::Level::Trace) {
            trace!("request_access");
        }
        let result: AddressResult = self
            .interactive
            .call("requestAccess")
            .await
            .map_err(map_error)?;
        Ok(result.address)
    }

    async fn get_address(&self) -> Result<Option<Address>, AgentError> {
        if log::log_enabled!(log::Level::Trace) {
            trace!("get_address");
        }
        let result: Option<AddressResult> =
            self.client.call("getAddress").await.map_err(map_error)?;
        Ok(result.map(|r| r.address))
    }

    async fn sign_transaction(
        &self,
        transaction: &[u8],
        network_passphrase: &str,
        signer: &Address,
    ) -> Result<Vec<u8>, AgentError> {
        if log::log_enabled!(log::Level::Trace) {
            trace!("sign_transaction for {}", signer);
        }
        let result: SignTransactionResult = self
            .interactive
            .call_with(
                "signTransaction",
                &SignTransactionParams {
                    transaction: Cow::Owned(hex::encode(transaction)),
                    network_passphrase: Cow::Borrowed(network_passphrase),
                    address: Some(Cow::Borrowed(signer)),
                },
            )
            .await
            .map_err(map_error)?;

        if let Some(address) = result.signer_address.as_ref().filter(|a| *a != signer) {
            return Err(AgentError::Protocol(format!(
                "signed by {} instead of {}",
                address, signer
            )));
        }

        hex::decode(&result.signed_transaction)
            .map_err(|e| AgentError::Protocol(format!("signed transaction is not hex: {}", e)))
    }
}
