use super::{AgentError, SigningAgent};
use crate::error::{InvokeError, Stage};
use log::{debug, info, warn};
use std::sync::Arc;
use tickets_common::crypto::Address;
use tokio::sync::RwLock;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignerState {
    Unknown,
    NotInstalled,
    // Installed, access not granted yet
    Unauthorized,
    Ready(Address),
}

// Tracks what we know about the signing agent.
// The state is transient and re-derived on demand, never persisted.
pub struct SignerProbe {
    agent: Arc<dyn SigningAgent>,
    state: RwLock<SignerState>,
}

impl SignerProbe {
    pub fn new(agent: Arc<dyn SigningAgent>) -> Self {
        Self {
            agent,
            state: RwLock::new(SignerState::Unknown),
        }
    }

    pub fn agent(&self) -> &Arc<dyn SigningAgent> {
        &self.agent
    }

    pub async fn state(&self) -> SignerState {
        self.state.read().await.clone()
    }

    async fn set_state(&self, state: SignerState) -> SignerState {
        if log::log_enabled!(log::Level::Debug) {
            debug!("Signer state is now {:?}", state);
        }
        *self.state.write().await = state.clone();
        state
    }

    // Detect the agent and whether access was already granted.
    // Any transport error is reported as `NotInstalled`.
    pub async fn probe_installed(&self) -> SignerState {
        let state = match self.agent.is_connected().await {
            Ok(true) => match self.agent.get_address().await {
                Ok(Some(address)) => SignerState::Ready(address),
                Ok(None) | Err(AgentError::Declined(_)) | Err(AgentError::Protocol(_)) => {
                    SignerState::Unauthorized
                }
                Err(AgentError::Unavailable(e)) => {
                    if log::log_enabled!(log::Level::Debug) {
                        debug!("Signing agent vanished while probing: {}", e);
                    }
                    SignerState::NotInstalled
                }
            },
            Ok(false) => SignerState::NotInstalled,
            Err(e) => {
                if log::log_enabled!(log::Level::Debug) {
                    debug!("Signing agent not detected: {}", e);
                }
                SignerState::NotInstalled
            }
        };

        self.set_state(state).await
    }

    pub async fn request_authorization(&self) -> Result<Address, InvokeError> {
        match self.agent.request_access().await {
            Ok(address) => {
                info!("Signing agent authorized for {}", address);
                self.set_state(SignerState::Ready(address.clone())).await;
                Ok(address)
            }
            Err(e) => Err(self.handle_error(e).await),
        }
    }

    // Address reported by the agent at the last probe, only set while `Ready`
    pub async fn current_address(&self) -> Option<Address> {
        match &*self.state.read().await {
            SignerState::Ready(address) => Some(address.clone()),
            _ => None,
        }
    }

    // Query the agent again for its active address.
    // Must be used before every signing use instead of any cached address.
    pub async fn refresh(&self) -> Result<Address, InvokeError> {
        match self.agent.get_address().await {
            Ok(Some(address)) => {
                self.set_state(SignerState::Ready(address.clone())).await;
                Ok(address)
            }
            Ok(None) => {
                self.set_state(SignerState::Unauthorized).await;
                Err(InvokeError::AuthorizationDenied(
                    "the signing agent has not granted access".to_owned(),
                ))
            }
            Err(e) => Err(self.handle_error(e).await),
        }
    }

    // The agent disappeared between the probe and its use
    pub async fn mark_unavailable(&self) {
        self.set_state(SignerState::NotInstalled).await;
    }

    async fn handle_error(&self, error: AgentError) -> InvokeError {
        match error {
            AgentError::Declined(reason) => {
                self.set_state(SignerState::Unauthorized).await;
                InvokeError::AuthorizationDenied(reason)
            }
            AgentError::Unavailable(reason) => {
                if log::log_enabled!(log::Level::Warn) {
                    warn!("Signing agent unavailable: {}", reason);
                }
                self.set_state(SignerState::NotInstalled).await;
                InvokeError::AgentUnavailable(Stage::Probe)
            }
            AgentError::Protocol(reason) => InvokeError::SigningProtocol {
                stage: Stage::Probe,
                reason,
            },
        }
    }
}
