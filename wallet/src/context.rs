use tickets_common::{crypto::ContractId, network::Network};

// Network and contract every invocation of an `Invoker` targets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkContext {
    pub network: Network,
    pub contract_id: ContractId,
}

impl NetworkContext {
    pub fn new(network: Network, contract_id: ContractId) -> Self {
        Self {
            network,
            contract_id,
        }
    }
}
