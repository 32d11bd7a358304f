use crate::{
    context::NetworkContext,
    error::{InvokeError, Stage},
    ledger_api::LedgerApi,
};
use log::debug;
use std::time::Duration;
use tickets_common::{
    account::AccountState,
    codec::EncodingError,
    config::{BASE_FEE, TRANSACTION_TIMEOUT_SECONDS},
    contract::InvocationRequest,
    crypto::Address,
    transaction::{InvokeContractOperation, TimeBounds, UnsignedTransaction},
};

// Fee ceiling and validity window applied to every built transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildOptions {
    pub base_fee: u32,
    pub timeout: Duration,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            base_fee: BASE_FEE,
            timeout: Duration::from_secs(TRANSACTION_TIMEOUT_SECONDS),
        }
    }
}

// Fetch the latest committed account state.
// Never cached: each invocation needs its own fresh sequence.
pub async fn fetch_account(
    api: &dyn LedgerApi,
    address: &Address,
) -> Result<AccountState, InvokeError> {
    let account = api
        .get_account(address)
        .await
        .map_err(|e| InvokeError::network(Stage::FetchAccount, e))?
        .ok_or_else(|| InvokeError::AccountNotFound(address.clone()))?;

    if log::log_enabled!(log::Level::Debug) {
        debug!(
            "Account {} is at sequence {}",
            account.address(),
            account.sequence()
        );
    }

    Ok(account)
}

// Build the single operation envelope calling `request` on the context contract.
// Pure: `now` is the current time in seconds, used for the validity window.
pub fn build_invocation(
    account: &AccountState,
    request: &InvocationRequest,
    context: &NetworkContext,
    options: &BuildOptions,
    now: u64,
) -> Result<UnsignedTransaction, InvokeError> {
    if account.address() != request.caller() {
        return Err(InvokeError::encoding(
            Stage::Build,
            EncodingError::InvalidAddress(format!(
                "account {} does not match caller {}",
                account.address(),
                request.caller()
            )),
        ));
    }

    let sequence = account
        .next_sequence()
        .map_err(|e| InvokeError::encoding(Stage::Build, e))?;

    // An open ended window would be rejected by the network
    let timeout = options.timeout.as_secs().max(1);
    let operation = InvokeContractOperation::new(
        context.contract_id.clone(),
        request.function().to_owned(),
        request.arguments().to_vec(),
    );

    let transaction = UnsignedTransaction::new(
        account.address().clone(),
        options.base_fee,
        sequence,
        TimeBounds::with_timeout(now, timeout),
        operation,
    );

    if log::log_enabled!(log::Level::Debug) {
        debug!(
            "Built '{}' call {} with sequence {}",
            request.function(),
            transaction.hash(&context.network),
            sequence
        );
    }

    Ok(transaction)
}
