use crate::{
    error::{InvokeError, Stage},
    ledger_api::LedgerApi,
};
use log::{debug, warn};
use tickets_common::{
    account::Sequence,
    codec::format_base_units,
    contract::ScValue,
    crypto::Hash,
    network::Network,
    serializer::{check_array_size, check_bytes_size, ReaderError, Serializer},
    transaction::{AuthorizationEntry, ContractTransactionData, PreparedTransaction, UnsignedTransaction},
};

// Outcome of a successful dry run, bound to the envelope it was computed for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Simulation {
    pub transaction_hash: Hash,
    pub sequence: Sequence,
    pub latest_ledger: u64,
    pub transaction_data: ContractTransactionData,
    pub min_resource_fee: u64,
    pub auth: Vec<AuthorizationEntry>,
    // Value the call would return
    pub return_value: Option<ScValue>,
    pub restore_required: bool,
}

fn decode_error<E: std::fmt::Display>(what: &str, error: E) -> InvokeError {
    InvokeError::Simulation(format!("cannot decode {}: {}", what, error))
}

// Non committing dry run of `transaction`.
// A reported revert or resource failure stops the chain here, before any signing.
pub async fn simulate(
    api: &dyn LedgerApi,
    transaction: &UnsignedTransaction,
    network: &Network,
) -> Result<Simulation, InvokeError> {
    let result = api
        .simulate_transaction(transaction)
        .await
        .map_err(|e| InvokeError::network(Stage::Simulate, e))?;

    if let Some(error) = result.error {
        if log::log_enabled!(log::Level::Warn) {
            warn!("Simulation failed at ledger {}: {}", result.latest_ledger, error);
        }
        return Err(InvokeError::Simulation(error));
    }

    let transaction_data = result
        .transaction_data
        .as_deref()
        .ok_or_else(|| InvokeError::Simulation("no resources were returned".to_owned()))
        .and_then(|hex| {
            ContractTransactionData::from_hex(hex).map_err(|e| decode_error("resources", e))
        })?;

    let (auth, return_value) = match result.results.first() {
        Some(call) => {
            let auth = call
                .auth
                .iter()
                .map(|hex| {
                    hex::decode(hex)
                        .map(AuthorizationEntry::new)
                        .map_err(|e| decode_error("authorization entry", e))
                })
                .collect::<Result<Vec<_>, _>>()?;

            let return_value = if call.xdr.is_empty() {
                None
            } else {
                Some(ScValue::from_hex(&call.xdr).map_err(|e| decode_error("return value", e))?)
            };
            (auth, return_value)
        }
        None => (Vec::new(), None),
    };

    let simulation = Simulation {
        transaction_hash: transaction.hash(network),
        sequence: transaction.transaction().sequence(),
        latest_ledger: result.latest_ledger,
        transaction_data,
        min_resource_fee: result.min_resource_fee,
        auth,
        return_value,
        restore_required: result.restore_preamble.is_some(),
    };

    if log::log_enabled!(log::Level::Debug) {
        debug!(
            "Simulation of {} passed at ledger {}: resource fee {}, {} auth entries",
            simulation.transaction_hash,
            simulation.latest_ledger,
            format_base_units(simulation.min_resource_fee as i128),
            simulation.auth.len()
        );
    }

    Ok(simulation)
}

// Everything merged from the simulation must decode again once signed
fn check_limits(simulation: &Simulation) -> Result<(), ReaderError> {
    simulation.transaction_data.resources.footprint.check_limits()?;
    check_array_size(simulation.auth.len())?;
    for entry in &simulation.auth {
        check_bytes_size(entry.as_bytes().len())?;
    }
    Ok(())
}

// Merge the simulated resources and authorization into a new snapshot.
// Any inconsistency means the whole chain must be rebuilt from a fresh account.
pub fn prepare(
    transaction: &UnsignedTransaction,
    simulation: &Simulation,
    network: &Network,
    now: u64,
) -> Result<PreparedTransaction, InvokeError> {
    let inner = transaction.transaction();
    if simulation.transaction_hash != transaction.hash(network)
        || simulation.sequence != inner.sequence()
    {
        return Err(InvokeError::Preparation(
            "simulation does not belong to this transaction".to_owned(),
        ));
    }

    if simulation.restore_required {
        return Err(InvokeError::Preparation(
            "archived ledger entries must be restored first".to_owned(),
        ));
    }

    if inner.time_bounds().is_expired(now) {
        return Err(InvokeError::Preparation(format!(
            "validity window ended at {}",
            inner.time_bounds().max_time
        )));
    }

    check_limits(simulation).map_err(|e| {
        InvokeError::Preparation(format!("simulated resources cannot be encoded: {}", e))
    })?;

    let resource_fee = simulation
        .min_resource_fee
        .max(simulation.transaction_data.resource_fee as u64);
    let fee = u32::try_from(resource_fee)
        .ok()
        .and_then(|resource_fee| inner.fee().checked_add(resource_fee))
        .ok_or_else(|| {
            InvokeError::Preparation(format!(
                "fee {} + {} does not fit the fee field",
                inner.fee(),
                resource_fee
            ))
        })?;

    let transaction_data = ContractTransactionData {
        resources: simulation.transaction_data.resources.clone(),
        resource_fee: resource_fee as i64,
    };

    let prepared = transaction.prepare(transaction_data, simulation.auth.clone(), fee);
    if log::log_enabled!(log::Level::Debug) {
        debug!("Prepared {} with total fee {}", prepared.hash(network), fee);
    }

    Ok(prepared)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use tickets_common::{
        api::{
            GetTransactionResult, RestorePreamble, SendTransactionResult,
            SimulateHostFunctionResult, SimulateTransactionResult,
        },
        account::AccountState,
        crypto::{Address, ContractId},
        rpc::{JsonRPCError, JsonRPCResult},
        serializer::{MAX_ARRAY_SIZE, MAX_BYTES_SIZE},
        transaction::{ContractResources, Footprint, InvokeContractOperation, LedgerKey, SignedTransaction, TimeBounds},
    };

    const CALLER: &str = "GAAZI4TCR3TY5OJHCTJC2A4QSY6CJWJH5IAJTGKIN2ER7LBNVKOCCWN7";
    const CONTRACT: &str = "CDLZFC3SYJYDZT7K67VZ75HPJVIEUVNIXF47ZG2FB2RMQQVU2HHGCYSC";

    struct SimulationOnly(JsonRPCResult<SimulateTransactionResult>);

    #[async_trait]
    impl LedgerApi for SimulationOnly {
        async fn get_account(&self, _: &Address) -> JsonRPCResult<Option<AccountState>> {
            unreachable!()
        }

        async fn simulate_transaction(
            &self,
            _: &UnsignedTransaction,
        ) -> JsonRPCResult<SimulateTransactionResult> {
            match &self.0 {
                Ok(result) => Ok(result.clone()),
                Err(e) => Err(JsonRPCError::Transport(e.to_string())),
            }
        }

        async fn send_transaction(
            &self,
            _: &SignedTransaction,
        ) -> JsonRPCResult<SendTransactionResult> {
            unreachable!()
        }

        async fn get_transaction(&self, _: &Hash) -> JsonRPCResult<GetTransactionResult> {
            unreachable!()
        }
    }

    fn unsigned() -> UnsignedTransaction {
        UnsignedTransaction::new(
            Address::new(CALLER).unwrap(),
            100,
            8,
            TimeBounds::with_timeout(1_000, 30),
            InvokeContractOperation::new(
                ContractId::new(CONTRACT).unwrap(),
                "initialize".to_owned(),
                vec![],
            ),
        )
    }

    fn resources() -> ContractTransactionData {
        ContractTransactionData {
            resources: ContractResources {
                footprint: Footprint {
                    read_only: vec![],
                    read_write: vec![LedgerKey::new(vec![1, 2])],
                },
                instructions: 10_000,
                read_bytes: 100,
                write_bytes: 50,
            },
            resource_fee: 4_000,
        }
    }

    fn passing() -> SimulateTransactionResult {
        SimulateTransactionResult {
            latest_ledger: 500,
            transaction_data: Some(resources().to_hex()),
            min_resource_fee: 5_000,
            results: vec![SimulateHostFunctionResult {
                auth: vec!["0a0b".to_owned()],
                xdr: ScValue::Void.to_hex(),
            }],
            ..Default::default()
        }
    }

    async fn simulation_of(result: SimulateTransactionResult) -> Result<Simulation, InvokeError> {
        simulate(&SimulationOnly(Ok(result)), &unsigned(), &Network::Testnet).await
    }

    #[tokio::test]
    async fn test_simulate_and_prepare() {
        let tx = unsigned();
        let simulation = simulation_of(passing()).await.unwrap();
        assert_eq!(simulation.auth, vec![AuthorizationEntry::new(vec![10, 11])]);
        assert_eq!(simulation.return_value, Some(ScValue::Void));

        let prepared = prepare(&tx, &simulation, &Network::Testnet, 1_010).unwrap();
        let inner = prepared.transaction();
        assert_eq!(inner.fee(), 5_100);
        assert_eq!(inner.sequence(), 8);
        assert_eq!(inner.operation().auth().len(), 1);
        let data = inner.contract_data().unwrap();
        assert_eq!(data.resource_fee, 5_000);
        assert_eq!(data.resources, resources().resources);
    }

    #[tokio::test]
    async fn test_simulation_error() {
        let result = SimulateTransactionResult {
            error: Some("HostError: Error(Contract, #3)".to_owned()),
            ..Default::default()
        };
        assert!(matches!(
            simulation_of(result).await,
            Err(InvokeError::Simulation(reason)) if reason.contains("#3")
        ));
    }

    #[tokio::test]
    async fn test_simulation_transport_error() {
        let api = SimulationOnly(Err(JsonRPCError::Transport("timeout".to_owned())));
        assert!(matches!(
            simulate(&api, &unsigned(), &Network::Testnet).await,
            Err(InvokeError::Network {
                stage: Stage::Simulate,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_undecodable_simulation() {
        let mut result = passing();
        result.transaction_data = Some("zz".to_owned());
        assert!(matches!(
            simulation_of(result).await,
            Err(InvokeError::Simulation(_))
        ));

        let mut result = passing();
        result.transaction_data = None;
        assert!(matches!(
            simulation_of(result).await,
            Err(InvokeError::Simulation(_))
        ));
    }

    #[tokio::test]
    async fn test_stale_simulation() {
        let simulation = simulation_of(passing()).await.unwrap();
        let other = UnsignedTransaction::new(
            Address::new(CALLER).unwrap(),
            100,
            9,
            TimeBounds::with_timeout(1_000, 30),
            InvokeContractOperation::new(
                ContractId::new(CONTRACT).unwrap(),
                "initialize".to_owned(),
                vec![],
            ),
        );
        assert!(matches!(
            prepare(&other, &simulation, &Network::Testnet, 1_010),
            Err(InvokeError::Preparation(_))
        ));
        // Same envelope on another network is another transaction
        assert!(matches!(
            prepare(&unsigned(), &simulation, &Network::Mainnet, 1_010),
            Err(InvokeError::Preparation(_))
        ));
    }

    #[tokio::test]
    async fn test_expired_window() {
        let simulation = simulation_of(passing()).await.unwrap();
        assert!(matches!(
            prepare(&unsigned(), &simulation, &Network::Testnet, 1_030),
            Err(InvokeError::Preparation(_))
        ));
    }

    #[tokio::test]
    async fn test_restore_required() {
        let mut result = passing();
        result.restore_preamble = Some(RestorePreamble {
            transaction_data: resources().to_hex(),
            min_resource_fee: 10,
        });
        let simulation = simulation_of(result).await.unwrap();
        assert!(simulation.restore_required);
        assert!(matches!(
            prepare(&unsigned(), &simulation, &Network::Testnet, 1_000),
            Err(InvokeError::Preparation(_))
        ));
    }

    #[tokio::test]
    async fn test_fee_overflow() {
        let mut result = passing();
        result.min_resource_fee = u32::MAX as u64;
        let simulation = simulation_of(result).await.unwrap();
        assert!(matches!(
            prepare(&unsigned(), &simulation, &Network::Testnet, 1_000),
            Err(InvokeError::Preparation(_))
        ));
    }

    #[tokio::test]
    async fn test_oversized_authorization_is_rejected() {
        // More entries than a decoder accepts back
        let mut result = passing();
        result.results[0].auth = vec!["0a0b".to_owned(); MAX_ARRAY_SIZE + 1];
        let simulation = simulation_of(result).await.unwrap();
        assert!(matches!(
            prepare(&unsigned(), &simulation, &Network::Testnet, 1_000),
            Err(InvokeError::Preparation(reason)) if reason.contains("cannot be encoded")
        ));

        let mut simulation = simulation_of(passing()).await.unwrap();
        simulation.auth = vec![AuthorizationEntry::new(vec![0; MAX_BYTES_SIZE + 1])];
        let error = prepare(&unsigned(), &simulation, &Network::Testnet, 1_000).unwrap_err();
        assert!(matches!(error, InvokeError::Preparation(_)));
        assert!(error.is_retryable());

        // At the limits the prepared transaction decodes again
        let mut simulation = simulation_of(passing()).await.unwrap();
        simulation.auth = vec![AuthorizationEntry::new(vec![1]); MAX_ARRAY_SIZE];
        let prepared = prepare(&unsigned(), &simulation, &Network::Testnet, 1_000).unwrap();
        assert_eq!(
            PreparedTransaction::from_bytes(&prepared.to_bytes()).unwrap(),
            prepared
        );
    }

    #[tokio::test]
    async fn test_failed_prepare_keeps_unsigned_snapshot() {
        let tx = unsigned();
        let before = tx.clone();
        let simulation = simulation_of(passing()).await.unwrap();
        assert!(prepare(&tx, &simulation, &Network::Testnet, 5_000).is_err());
        assert_eq!(tx, before);
    }
}
