mod agent;
mod ledger;

pub use agent::*;
pub use ledger::*;
