// Request and response shapes of the ledger RPC boundary.
// Binary payloads (transactions, resources, return values) travel
// hex-encoded in their canonical serializer form.

use crate::crypto::{Address, Hash};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use strum::{Display, EnumString};

#[derive(Serialize, Deserialize)]
pub struct GetAccountParams<'a> {
    pub address: Cow<'a, Address>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GetAccountResult {
    pub id: Address,
    pub sequence: i64,
}

#[derive(Serialize, Deserialize)]
pub struct TransactionParams<'a> {
    // Canonical bytes of the transaction, hex encoded
    pub transaction: Cow<'a, str>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulateHostFunctionResult {
    // Authorization entries, hex encoded
    #[serde(default)]
    pub auth: Vec<String>,
    // Return value the call would produce, hex encoded
    pub xdr: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestorePreamble {
    pub transaction_data: String,
    pub min_resource_fee: u64,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulateTransactionResult {
    pub latest_ledger: u64,
    // Set when the call would revert or exceed its resource limits
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_data: Option<String>,
    #[serde(default)]
    pub min_resource_fee: u64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub results: Vec<SimulateHostFunctionResult>,
    // Archived entries must be restored before the call can succeed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restore_preamble: Option<RestorePreamble>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum SendTransactionStatus {
    Pending,
    Duplicate,
    TryAgainLater,
    Error,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendTransactionResult {
    pub hash: Hash,
    pub status: SendTransactionStatus,
    #[serde(default)]
    pub latest_ledger: u64,
    // Network reason when the status is an error
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_result: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct GetTransactionParams<'a> {
    pub hash: Cow<'a, Hash>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum GetTransactionStatus {
    NotFound,
    Success,
    Failed,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetTransactionResult {
    pub status: GetTransactionStatus,
    #[serde(default)]
    pub latest_ledger: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ledger: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee_charged: Option<i64>,
    // Hex encoded return value of a successful call
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_value: Option<String>,
    // Network reported reason of a failed call
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_reason: Option<String>,
}
