use crate::crypto::{hash, Hash};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

lazy_static! {
    static ref MAINNET_ID: Hash = hash(Network::Mainnet.passphrase().as_bytes());
    static ref TESTNET_ID: Hash = hash(Network::Testnet.passphrase().as_bytes());
    static ref FUTURENET_ID: Hash = hash(Network::Futurenet.passphrase().as_bytes());
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Network {
    Mainnet,
    #[default]
    Testnet,
    Futurenet,
}

impl Network {
    // Passphrase handed to the signing agent and mixed in every transaction hash
    pub fn passphrase(&self) -> &'static str {
        match self {
            Self::Mainnet => "Public Global Stellar Network ; September 2015",
            Self::Testnet => "Test SDF Network ; September 2015",
            Self::Futurenet => "Test SDF Future Network ; October 2022",
        }
    }

    pub fn default_rpc_url(&self) -> &'static str {
        match self {
            Self::Mainnet => "https://soroban-rpc.mainnet.stellar.org",
            Self::Testnet => "https://soroban-testnet.stellar.org",
            Self::Futurenet => "https://rpc-futurenet.stellar.org",
        }
    }

    pub fn network_id(&self) -> &'static Hash {
        match self {
            Self::Mainnet => &MAINNET_ID,
            Self::Testnet => &TESTNET_ID,
            Self::Futurenet => &FUTURENET_ID,
        }
    }
}
