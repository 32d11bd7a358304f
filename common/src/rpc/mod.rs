#[cfg(feature = "rpc-client")]
mod client;

mod error;
mod types;

#[cfg(feature = "rpc-client")]
pub use client::*;

pub use error::*;
pub use types::*;
