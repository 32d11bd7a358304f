use crate::{
    cancel::CancelToken,
    context::NetworkContext,
    error::{InvokeError, Stage},
    ledger_api::LedgerApi,
    poller::{await_confirmation, submit, ConfirmationResult, PollConfig},
    preparer::{prepare, simulate},
    signer::{sign, SignerProbe},
    transaction_builder::{build_invocation, fetch_account, BuildOptions},
};
use log::{debug, info, warn};
use std::{sync::Arc, time::Duration};
use tickets_common::{
    config::{BASE_FEE, TRANSACTION_TIMEOUT_SECONDS},
    contract::{InvocationRequest, ScValue},
    crypto::Address,
    time::get_current_time_in_seconds,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvokerConfig {
    pub base_fee: u32,
    pub timeout: Duration,
    pub poll: PollConfig,
}

impl Default for InvokerConfig {
    fn default() -> Self {
        Self {
            base_fee: BASE_FEE,
            timeout: Duration::from_secs(TRANSACTION_TIMEOUT_SECONDS),
            poll: PollConfig::default(),
        }
    }
}

impl InvokerConfig {
    fn build_options(&self) -> BuildOptions {
        BuildOptions {
            base_fee: self.base_fee,
            timeout: self.timeout,
        }
    }
}

/// Entry point composing the whole invocation chain:
/// fetch account, build, simulate, prepare, sign, submit and confirm.
///
/// Every call starts from a freshly fetched account. Nothing is carried
/// over between calls except the signer probe state, so a failed call
/// is retried by calling again.
pub struct Invoker {
    ledger: Arc<dyn LedgerApi>,
    signer: Arc<SignerProbe>,
    context: NetworkContext,
    config: InvokerConfig,
}

impl Invoker {
    pub fn new(
        ledger: Arc<dyn LedgerApi>,
        signer: Arc<SignerProbe>,
        context: NetworkContext,
        config: InvokerConfig,
    ) -> Self {
        Self {
            ledger,
            signer,
            context,
            config,
        }
    }

    pub fn ledger(&self) -> &Arc<dyn LedgerApi> {
        &self.ledger
    }

    pub fn signer(&self) -> &Arc<SignerProbe> {
        &self.signer
    }

    pub fn context(&self) -> &NetworkContext {
        &self.context
    }

    pub fn config(&self) -> &InvokerConfig {
        &self.config
    }

    pub async fn invoke<S: Into<String>>(
        &self,
        function: S,
        arguments: Vec<ScValue>,
        caller: Address,
    ) -> Result<ConfirmationResult, InvokeError> {
        let request = InvocationRequest::new(function, arguments, caller)
            .map_err(|e| InvokeError::encoding(Stage::Build, e))?;
        self.invoke_with_cancel(&request, &CancelToken::new()).await
    }

    // Run the chain for `request`. `token` interrupts the signing wait and the
    // confirmation poll; a transaction already submitted is never rolled back.
    pub async fn invoke_with_cancel(
        &self,
        request: &InvocationRequest,
        token: &CancelToken,
    ) -> Result<ConfirmationResult, InvokeError> {
        let result = self.run(request, token).await;
        if let Err(e) = &result {
            if log::log_enabled!(log::Level::Warn) {
                warn!(
                    "Invocation of '{}' failed at stage {}: {}",
                    request.function(),
                    e.stage(),
                    e
                );
            }
        }
        result
    }

    async fn run(
        &self,
        request: &InvocationRequest,
        token: &CancelToken,
    ) -> Result<ConfirmationResult, InvokeError> {
        let network = &self.context.network;
        if token.is_cancelled() {
            return Err(InvokeError::Cancelled {
                stage: Stage::Probe,
                transaction: None,
            });
        }

        // The active address may have changed since the last probe
        let active = self.signer.refresh().await?;
        if &active != request.caller() {
            return Err(InvokeError::SignerMismatch {
                requested: request.caller().clone(),
                active,
            });
        }

        if log::log_enabled!(log::Level::Debug) {
            debug!("Invoking '{}' as {}", request.function(), active);
        }

        let account = fetch_account(self.ledger.as_ref(), request.caller()).await?;
        let unsigned = build_invocation(
            &account,
            request,
            &self.context,
            &self.config.build_options(),
            get_current_time_in_seconds(),
        )?;

        let simulation = simulate(self.ledger.as_ref(), &unsigned, network).await?;
        let prepared = prepare(&unsigned, &simulation, network, get_current_time_in_seconds())?;

        let signed = match sign(
            self.signer.agent().as_ref(),
            &prepared,
            network,
            &active,
            token,
        )
        .await
        {
            Ok(signed) => signed,
            Err(e) => {
                if matches!(e, InvokeError::AgentUnavailable(_)) {
                    self.signer.mark_unavailable().await;
                }
                return Err(e);
            }
        };

        // Last point where cancelling leaves nothing behind on the network
        if token.is_cancelled() {
            return Err(InvokeError::Cancelled {
                stage: Stage::Submit,
                transaction: None,
            });
        }

        let hash = submit(self.ledger.as_ref(), &signed, network).await?;
        info!("'{}' submitted as {}", request.function(), hash);

        let result = await_confirmation(self.ledger.as_ref(), &hash, &self.config.poll, token).await?;
        if log::log_enabled!(log::Level::Debug) {
            debug!("Invocation {} ended: {:?}", hash, result);
        }

        Ok(result)
    }
}
