// Request and response shapes of the signing agent boundary

use crate::crypto::Address;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

// Error code used by agents when the user refuses a request
pub const AGENT_USER_DECLINED_CODE: i16 = -4;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IsConnectedResult {
    pub is_connected: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AddressResult {
    pub address: Address,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignTransactionParams<'a> {
    // Canonical bytes of the prepared transaction, hex encoded
    pub transaction: Cow<'a, str>,
    pub network_passphrase: Cow<'a, str>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Cow<'a, Address>>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignTransactionResult {
    // Canonical bytes of the signed transaction, hex encoded
    pub signed_transaction: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signer_address: Option<Address>,
}
