use crate::serializer::ReaderError;
use serde_json::Error as SerdeError;
use thiserror::Error;

pub type JsonRPCResult<T> = Result<T, JsonRPCError>;

#[derive(Error, Debug)]
pub enum JsonRPCError {
    // The request never got an answer: connection refused, timeout, TLS...
    #[error("Transport error: {}", _0)]
    Transport(String),
    // Connected and sent, but no answer in time
    #[error("Request timed out: {}", _0)]
    Timeout(String),
    #[error("HTTP error {}", _0)]
    HttpStatus(u16),
    #[error("Expected json_rpc set to '2.0', got '{}'", _0)]
    InvalidVersion(String),
    #[error("Server returned error {}: {}", code, message)]
    ServerError {
        code: i16,
        message: String,
        data: Option<String>,
    },
    #[error("Invalid response: {}", _0)]
    InvalidResponse(#[from] SerdeError),
    #[error("Invalid payload: {}", _0)]
    InvalidPayload(#[from] ReaderError),
}

impl JsonRPCError {
    // True when the remote side may not have seen the request at all
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::HttpStatus(_))
    }

    pub fn code(&self) -> Option<i16> {
        match self {
            Self::ServerError { code, .. } => Some(*code),
            _ => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Self::ServerError { message, .. } => Some(message),
            _ => None,
        }
    }
}
