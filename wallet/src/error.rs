use serde::Serialize;
use strum::Display;
use thiserror::Error;
use tickets_common::{
    codec::EncodingError,
    crypto::{Address, Hash},
    rpc::JsonRPCError,
};

// Pipeline stage an error originates from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Probe,
    FetchAccount,
    Build,
    Simulate,
    Prepare,
    Sign,
    Submit,
    Confirm,
}

#[derive(Debug, Error)]
pub enum InvokeError {
    // Bad input shape: a caller bug
    #[error("[{}] invalid input: {}", stage, source)]
    Encoding {
        stage: Stage,
        #[source]
        source: EncodingError,
    },
    #[error("account {} does not exist on the network", _0)]
    AccountNotFound(Address),
    #[error("[{}] signing agent is unavailable", _0)]
    AgentUnavailable(Stage),
    #[error("access to the signing agent was denied: {}", _0)]
    AuthorizationDenied(String),
    #[error("caller {} is not the active signer {}", requested, active)]
    SignerMismatch { requested: Address, active: Address },
    #[error("signing was rejected: {}", _0)]
    SigningRejected(String),
    #[error("[{}] invalid signing agent response: {}", stage, reason)]
    SigningProtocol { stage: Stage, reason: String },
    #[error("[{}] network error: {}", stage, source)]
    Network {
        stage: Stage,
        #[source]
        source: JsonRPCError,
    },
    #[error("simulation failed: {}", _0)]
    Simulation(String),
    #[error("preparation failed: {}", _0)]
    Preparation(String),
    #[error("submission rejected: {}", _0)]
    SubmissionRejected(String),
    // `transaction` is set once the transaction has been submitted:
    // it may still be included by the network
    #[error("[{}] cancelled", stage)]
    Cancelled {
        stage: Stage,
        transaction: Option<Hash>,
    },
}

impl InvokeError {
    pub fn encoding(stage: Stage, source: EncodingError) -> Self {
        Self::Encoding { stage, source }
    }

    pub fn network(stage: Stage, source: JsonRPCError) -> Self {
        Self::Network { stage, source }
    }

    pub fn stage(&self) -> Stage {
        match self {
            Self::Encoding { stage, .. }
            | Self::SigningProtocol { stage, .. }
            | Self::Network { stage, .. }
            | Self::Cancelled { stage, .. } => *stage,
            Self::AgentUnavailable(stage) => *stage,
            Self::AccountNotFound(_) => Stage::FetchAccount,
            Self::AuthorizationDenied(_) | Self::SignerMismatch { .. } => Stage::Probe,
            Self::SigningRejected(_) => Stage::Sign,
            Self::Simulation(_) => Stage::Simulate,
            Self::Preparation(_) => Stage::Prepare,
            Self::SubmissionRejected(_) => Stage::Submit,
        }
    }

    // Whether the whole chain, starting again from the account fetch, may be retried.
    // Never resume from the failed stage.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Network { .. }
                | Self::Simulation(_)
                | Self::Preparation(_)
                | Self::SubmissionRejected(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_names() {
        assert_eq!(Stage::FetchAccount.to_string(), "fetch_account");
        assert_eq!(
            serde_json::to_string(&Stage::Confirm).unwrap(),
            "\"confirm\""
        );
    }

    #[test]
    fn test_classification() {
        let error = InvokeError::network(
            Stage::Simulate,
            JsonRPCError::Transport("connection reset".to_owned()),
        );
        assert_eq!(error.stage(), Stage::Simulate);
        assert!(error.is_retryable());
        assert!(error.to_string().starts_with("[simulate]"));

        let error = InvokeError::SigningRejected("user declined".to_owned());
        assert_eq!(error.stage(), Stage::Sign);
        assert!(!error.is_retryable());

        let error = InvokeError::encoding(Stage::Build, EncodingError::NegativeValue(-1));
        assert_eq!(error.stage(), Stage::Build);
        assert!(!error.is_retryable());

        assert!(InvokeError::Preparation("stale".to_owned()).is_retryable());
        assert!(InvokeError::SubmissionRejected("bad seq".to_owned()).is_retryable());
        assert!(!InvokeError::Cancelled {
            stage: Stage::Confirm,
            transaction: None
        }
        .is_retryable());
    }
}
