pub mod cancel;
pub mod context;
pub mod error;
pub mod invoker;
pub mod ledger_api;
pub mod poller;
pub mod preparer;
pub mod signer;
pub mod ticketing;
pub mod transaction_builder;

#[cfg(feature = "cli")]
pub mod config;
