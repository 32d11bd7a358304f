use crate::{
    cancel::CancelToken,
    error::{InvokeError, Stage},
    ledger_api::LedgerApi,
};
use log::{debug, info, warn};
use serde::Serialize;
use std::time::Duration;
use tickets_common::{
    api::{GetTransactionResult, GetTransactionStatus, SendTransactionStatus},
    config::{DEFAULT_MAX_POLL_ATTEMPTS, DEFAULT_POLL_INTERVAL_MS},
    contract::ScValue,
    crypto::Hash,
    network::Network,
    serializer::{ReaderError, Serializer},
    transaction::SignedTransaction,
};
use tokio::time::{sleep, Instant};

// Bound of the confirmation loop: whichever limit is reached first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    pub interval: Duration,
    pub max_attempts: u32,
    pub max_duration: Option<Duration>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            max_attempts: DEFAULT_MAX_POLL_ATTEMPTS,
            max_duration: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionEffects {
    pub hash: Hash,
    pub ledger: Option<u64>,
    pub created_at: Option<u64>,
    pub fee_charged: Option<i64>,
    // Hex encoded as reported by the network
    pub return_value: Option<String>,
}

impl TransactionEffects {
    fn from_result(hash: &Hash, result: GetTransactionResult) -> Self {
        Self {
            hash: hash.clone(),
            ledger: result.ledger,
            created_at: result.created_at,
            fee_charged: result.fee_charged,
            return_value: result.return_value,
        }
    }

    pub fn decode_return_value(&self) -> Result<Option<ScValue>, ReaderError> {
        self.return_value
            .as_deref()
            .filter(|hex| !hex.is_empty())
            .map(ScValue::from_hex)
            .transpose()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationResult {
    Success(TransactionEffects),
    // Reason reported by the network, verbatim
    Failed(String),
    // Not observed in time. The transaction may still be included:
    // query its status again later, never submit it again.
    TimedOut { hash: Hash },
}

// Submit the signed envelope. On acceptance the transaction is pending under the returned hash,
// which the network must report identically.
pub async fn submit(
    api: &dyn LedgerApi,
    transaction: &SignedTransaction,
    network: &Network,
) -> Result<Hash, InvokeError> {
    let hash = transaction.hash(network);
    let result = api
        .send_transaction(transaction)
        .await
        .map_err(|e| InvokeError::network(Stage::Submit, e))?;

    match result.status {
        SendTransactionStatus::Pending | SendTransactionStatus::Duplicate => {
            if result.hash != hash {
                return Err(InvokeError::SigningProtocol {
                    stage: Stage::Submit,
                    reason: format!(
                        "network reported hash {} for submitted transaction {}",
                        result.hash, hash
                    ),
                });
            }
            info!("Transaction {} submitted ({})", hash, result.status);
            Ok(hash)
        }
        SendTransactionStatus::Error | SendTransactionStatus::TryAgainLater => {
            let reason = result
                .error_result
                .unwrap_or_else(|| result.status.to_string());
            if log::log_enabled!(log::Level::Warn) {
                warn!("Transaction {} rejected: {}", hash, reason);
            }
            Err(InvokeError::SubmissionRejected(reason))
        }
    }
}

// Query the status of `hash` every `config.interval` until it is terminal or the bound is hit.
// Transport errors while polling are counted as non terminal attempts.
// Cancelling stops the polling only, the submitted transaction is left as is.
pub async fn await_confirmation(
    api: &dyn LedgerApi,
    hash: &Hash,
    config: &PollConfig,
    token: &CancelToken,
) -> Result<ConfirmationResult, InvokeError> {
    let cancelled = || InvokeError::Cancelled {
        stage: Stage::Confirm,
        transaction: Some(hash.clone()),
    };
    let deadline = config.max_duration.map(|duration| Instant::now() + duration);
    // A submitted transaction is always queried at least once
    let max_attempts = config.max_attempts.max(1);

    for attempt in 1..=max_attempts {
        let response = token
            .run(api.get_transaction(hash))
            .await
            .ok_or_else(cancelled)?;

        match response {
            Ok(result) => match result.status {
                GetTransactionStatus::Success => {
                    info!("Transaction {} confirmed at ledger {:?}", hash, result.ledger);
                    return Ok(ConfirmationResult::Success(TransactionEffects::from_result(
                        hash, result,
                    )));
                }
                GetTransactionStatus::Failed => {
                    let reason = result
                        .result_reason
                        .unwrap_or_else(|| GetTransactionStatus::Failed.to_string());
                    if log::log_enabled!(log::Level::Warn) {
                        warn!("Transaction {} failed: {}", hash, reason);
                    }
                    return Ok(ConfirmationResult::Failed(reason));
                }
                GetTransactionStatus::NotFound => {
                    if log::log_enabled!(log::Level::Debug) {
                        debug!(
                            "Transaction {} not found yet ({}/{})",
                            hash, attempt, max_attempts
                        );
                    }
                }
            },
            Err(e) => {
                if log::log_enabled!(log::Level::Warn) {
                    warn!(
                        "Error while polling {} ({}/{}): {}",
                        hash, attempt, max_attempts, e
                    );
                }
            }
        }

        if attempt == max_attempts {
            break;
        }

        let delay = match deadline {
            Some(deadline) => {
                let remaining = deadline.saturating_duration_since(Instant::now());
                if remaining.is_zero() {
                    break;
                }
                config.interval.min(remaining)
            }
            None => config.interval,
        };

        token.run(sleep(delay)).await.ok_or_else(cancelled)?;
    }

    if log::log_enabled!(log::Level::Warn) {
        warn!("Transaction {} not confirmed in time", hash);
    }
    Ok(ConfirmationResult::TimedOut { hash: hash.clone() })
}
