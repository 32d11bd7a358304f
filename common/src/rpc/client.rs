use super::{Id, JsonRPCError, JsonRPCResult, RpcRequest, RpcResponse, JSON_RPC_VERSION};
use log::{debug, trace};
use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::Duration,
};

// Default time given to a single HTTP request
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

// JSON-RPC 2.0 client over HTTP(S)
pub struct JsonRPCClient {
    http: Client,
    target: String,
    count: AtomicU64,
}

impl JsonRPCClient {
    pub fn new<S: Into<String>>(target: S) -> JsonRPCResult<Self> {
        Self::with(target, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with<S: Into<String>>(target: S, timeout: Duration) -> JsonRPCResult<Self> {
        Self::with_options(target, Some(timeout))
    }

    // `None` waits for the answer as long as the connection stays open,
    // only connecting is bounded
    pub fn with_options<S: Into<String>>(
        target: S,
        timeout: Option<Duration>,
    ) -> JsonRPCResult<Self> {
        let mut target = target.into();
        if !target.starts_with("http://") && !target.starts_with("https://") {
            target = format!("http://{}", target);
        }

        let mut builder = Client::builder().connect_timeout(DEFAULT_CONNECT_TIMEOUT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| JsonRPCError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            target,
            count: AtomicU64::new(0),
        })
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    // Call a method without parameters
    pub async fn call<R: DeserializeOwned>(&self, method: &str) -> JsonRPCResult<R> {
        self.send::<(), R>(method, None).await
    }

    pub async fn call_with<P: Serialize, R: DeserializeOwned>(
        &self,
        method: &str,
        params: &P,
    ) -> JsonRPCResult<R> {
        self.send(method, Some(params)).await
    }

    async fn send<P: Serialize, R: DeserializeOwned>(
        &self,
        method: &str,
        params: Option<&P>,
    ) -> JsonRPCResult<R> {
        let id = self.count.fetch_add(1, Ordering::SeqCst);
        let request = RpcRequest {
            jsonrpc: JSON_RPC_VERSION,
            id: Id::Number(id),
            method,
            params,
        };

        if log::log_enabled!(log::Level::Trace) {
            trace!("Sending request #{} '{}' to {}", id, method, self.target);
        }

        let response = self
            .http
            .post(self.target.as_str())
            .json(&request)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            debug!("Request '{}' to {} failed with HTTP {}", method, self.target, status);
            return Err(JsonRPCError::HttpStatus(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(map_transport_error)?;
        let response: RpcResponse = serde_json::from_slice(&body)?;
        parse_response(response)
    }
}

// A request sent but left unanswered is not an unreachable target
fn map_transport_error(error: reqwest::Error) -> JsonRPCError {
    if error.is_timeout() && !error.is_connect() {
        JsonRPCError::Timeout(error.to_string())
    } else {
        JsonRPCError::Transport(error.to_string())
    }
}

// Extract the typed result of a response.
// A missing result is read as `null` so optional results can be expressed as `Option<R>`.
pub fn parse_response<R: DeserializeOwned>(response: RpcResponse) -> JsonRPCResult<R> {
    if response.jsonrpc != JSON_RPC_VERSION {
        return Err(JsonRPCError::InvalidVersion(response.jsonrpc));
    }

    if let Some(error) = response.error {
        return Err(JsonRPCError::ServerError {
            code: error.code,
            message: error.message,
            data: error.data.map(|v| v.to_string()),
        });
    }

    let result = response.result.unwrap_or(Value::Null);
    Ok(serde_json::from_value(result)?)
}
