pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ===== CURRENCY =====
// 7 decimals numbers
pub const COIN_DECIMALS: u8 = 7;
// 10 000 000 base units to represent 1 display unit
pub const BASE_UNITS_PER_COIN: u64 = 10u64.pow(COIN_DECIMALS as u32);

// ===== TRANSACTION =====
// Nominal inclusion fee ceiling in base units, the resource fee
// computed by the simulation is added on top of it
pub const BASE_FEE: u32 = 100;
// Transactions must expire: upper time bound in seconds after build
pub const TRANSACTION_TIMEOUT_SECONDS: u64 = 30;
// Envelope type tag mixed in the transaction hash
pub const ENVELOPE_TYPE_TX: u32 = 2;

// ===== CONTRACT CALLS =====
// Maximum length of a short symbol argument
pub const SYMBOL_SHORT_MAX_LEN: usize = 9;
// Maximum length of a contract entry point name
pub const MAX_FUNCTION_NAME_LEN: usize = 32;
// Maximum number of arguments for a single contract call
pub const MAX_ARGUMENTS_PER_CALL: usize = 64;

// ===== CONFIRMATION =====
// Delay between two status queries
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;
// Number of status queries before giving up with a timeout
pub const DEFAULT_MAX_POLL_ATTEMPTS: u32 = 30;

// Static checks
const _: () = assert!(
    MAX_ARGUMENTS_PER_CALL <= crate::serializer::MAX_ARRAY_SIZE,
    "Arguments must fit in a serialized vector"
);
