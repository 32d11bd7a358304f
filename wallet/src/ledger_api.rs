use async_trait::async_trait;
use log::trace;
use std::borrow::Cow;
use tickets_common::{
    account::AccountState,
    api::{
        GetAccountParams, GetAccountResult, GetTransactionParams, GetTransactionResult,
        SendTransactionResult, SimulateTransactionResult, TransactionParams,
    },
    crypto::{Address, Hash},
    rpc::{JsonRPCClient, JsonRPCError, JsonRPCResult},
    serializer::Serializer,
    transaction::{SignedTransaction, UnsignedTransaction},
};

// Ledger RPC boundary used by the invocation pipeline
#[async_trait]
pub trait LedgerApi: Send + Sync {
    // `None` when the account was never funded
    async fn get_account(&self, address: &Address) -> JsonRPCResult<Option<AccountState>>;

    async fn simulate_transaction(
        &self,
        transaction: &UnsignedTransaction,
    ) -> JsonRPCResult<SimulateTransactionResult>;

    async fn send_transaction(
        &self,
        transaction: &SignedTransaction,
    ) -> JsonRPCResult<SendTransactionResult>;

    async fn get_transaction(&self, hash: &Hash) -> JsonRPCResult<GetTransactionResult>;
}

pub struct RpcLedgerApi {
    client: JsonRPCClient,
}

impl RpcLedgerApi {
    pub fn new<S: Into<String>>(rpc_url: S) -> JsonRPCResult<Self> {
        Ok(Self {
            client: JsonRPCClient::new(rpc_url)?,
        })
    }
}

// Codes reserved by JSON-RPC itself (parse error, unknown method, bad params...)
const RESERVED_ERROR_CODES: std::ops::RangeInclusive<i16> = -32768..=-32600;
const ACCOUNT_NOT_FOUND_MESSAGE: &str = "account not found";

// Unfunded accounts are reported as an error by some servers.
// Protocol level errors never mean the account is missing.
fn is_account_not_found(error: &JsonRPCError) -> bool {
    match error {
        JsonRPCError::ServerError { code, message, .. } => {
            !RESERVED_ERROR_CODES.contains(code)
                && message.trim().eq_ignore_ascii_case(ACCOUNT_NOT_FOUND_MESSAGE)
        }
        _ => false,
    }
}

#[async_trait]
impl LedgerApi for RpcLedgerApi {
    async fn get_account(&self, address: &Address) -> JsonRPCResult<Option<AccountState>> {
        if log::log_enabled!(log::Level::Trace) {
            trace!("get_account {}", address);
        }

        let result: JsonRPCResult<Option<GetAccountResult>> = self
            .client
            .call_with(
                "getAccount",
                &GetAccountParams {
                    address: Cow::Borrowed(address),
                },
            )
            .await;

        match result {
            Ok(account) => Ok(account.map(|account| AccountState::new(account.id, account.sequence))),
            Err(e) if is_account_not_found(&e) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn simulate_transaction(
        &self,
        transaction: &UnsignedTransaction,
    ) -> JsonRPCResult<SimulateTransactionResult> {
        if log::log_enabled!(log::Level::Trace) {
            trace!("simulate_transaction");
        }
        self.client
            .call_with(
                "simulateTransaction",
                &TransactionParams {
                    transaction: Cow::Owned(transaction.to_hex()),
                },
            )
            .await
    }

    async fn send_transaction(
        &self,
        transaction: &SignedTransaction,
    ) -> JsonRPCResult<SendTransactionResult> {
        if log::log_enabled!(log::Level::Trace) {
            trace!("send_transaction");
        }
        self.client
            .call_with(
                "sendTransaction",
                &TransactionParams {
                    transaction: Cow::Owned(transaction.to_hex()),
                },
            )
            .await
    }

    async fn get_transaction(&self, hash: &Hash) -> JsonRPCResult<GetTransactionResult> {
        if log::log_enabled!(log::Level::Trace) {
            trace!("get_transaction {}", hash);
        }
        self.client
            .call_with(
                "getTransaction",
                &GetTransactionParams {
                    hash: Cow::Borrowed(hash),
                },
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server_error(code: i16, message: &str) -> JsonRPCError {
        JsonRPCError::ServerError {
            code,
            message: message.to_owned(),
            data: None,
        }
    }

    #[test]
    fn test_account_not_found_detection() {
        assert!(is_account_not_found(&server_error(-32001, "Account not found")));
        assert!(is_account_not_found(&server_error(404, "account not found")));

        assert!(!is_account_not_found(&server_error(-32603, "internal error")));
        assert!(!is_account_not_found(&JsonRPCError::Transport(
            "not found".to_owned()
        )));
    }

    #[test]
    fn test_unknown_method_is_not_a_missing_account() {
        // A wrong RPC URL must stay a retryable network error
        assert!(!is_account_not_found(&server_error(-32601, "Method not found")));
        assert!(!is_account_not_found(&server_error(-32001, "Method not found")));
        assert!(!is_account_not_found(&server_error(-32600, "Account not found")));
    }

    #[tokio::test]
    async fn test_unknown_method_keeps_the_error() {
        // Answers every request with an unknown method error
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move {
            use tokio::io::{AsyncReadExt, AsyncWriteExt};
            while let Ok((mut socket, _)) = listener.accept().await {
                let mut buffer = [0u8; 4096];
                let _ = socket.read(&mut buffer).await;
                let body = r#"{"jsonrpc":"2.0","id":0,"error":{"code":-32601,"message":"Method not found"}}"#;
                let response = format!(
                    "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
            }
        });

        let api = RpcLedgerApi::new(address.to_string()).unwrap();
        let caller =
            Address::new("GAAZI4TCR3TY5OJHCTJC2A4QSY6CJWJH5IAJTGKIN2ER7LBNVKOCCWN7").unwrap();
        match api.get_account(&caller).await {
            Err(e) => assert_eq!(e.code(), Some(-32601)),
            Ok(account) => panic!("unexpected {:?}", account),
        }
    }
}
