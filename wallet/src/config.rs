use crate::{invoker::InvokerConfig, poller::PollConfig};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tickets_common::{
    config::{
        BASE_FEE, DEFAULT_MAX_POLL_ATTEMPTS, DEFAULT_POLL_INTERVAL_MS,
        TRANSACTION_TIMEOUT_SECONDS, VERSION,
    },
    logger::{default_logs_datetime_format, LogLevel, ModuleConfig},
    network::Network,
};

// Local signing agent endpoint used when none is specified
pub const DEFAULT_AGENT_ADDRESS: &str = "http://127.0.0.1:8686";

// Functions Helpers
fn default_agent_address() -> String {
    DEFAULT_AGENT_ADDRESS.to_owned()
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

fn default_max_poll_attempts() -> u32 {
    DEFAULT_MAX_POLL_ATTEMPTS
}

fn default_base_fee() -> u32 {
    BASE_FEE
}

fn default_tx_timeout_secs() -> u64 {
    TRANSACTION_TIMEOUT_SECONDS
}

fn default_log_filename() -> String {
    String::from("tickets-wallet.log")
}

fn default_logs_path() -> String {
    String::from("logs/")
}

#[derive(Debug, Clone, clap::Args, Serialize, Deserialize)]
pub struct LogConfig {
    /// Set log level
    #[clap(long, value_enum, default_value_t)]
    #[serde(default)]
    pub log_level: LogLevel,
    /// Set file log level
    /// By default, it will be the same as log level
    #[clap(long, value_enum)]
    pub file_log_level: Option<LogLevel>,
    /// Disable the log file
    #[clap(long)]
    #[serde(default)]
    pub disable_file_logging: bool,
    /// Disable the log filename date based
    /// If disabled, the log file will be named tickets-wallet.log instead of YYYY-MM-DD.tickets-wallet.log
    #[clap(long)]
    #[serde(default)]
    pub disable_file_log_date_based: bool,
    /// Disable the usage of colors in log
    #[clap(long)]
    #[serde(default)]
    pub disable_log_color: bool,
    /// Log filename
    ///
    /// By default filename is tickets-wallet.log.
    /// File will be stored in logs directory, this is only the filename, not the full path.
    #[clap(long, default_value_t = default_log_filename())]
    #[serde(default = "default_log_filename")]
    pub filename_log: String,
    /// Logs directory
    ///
    /// By default it will be logs/ of the current directory.
    #[clap(long, default_value_t = default_logs_path())]
    #[serde(default = "default_logs_path")]
    pub logs_path: String,
    /// Module configuration for logs, written module=level
    #[clap(long)]
    #[serde(default)]
    pub logs_modules: Vec<ModuleConfig>,
    /// Change the datetime format used by the logger
    #[clap(long, default_value_t = default_logs_datetime_format())]
    #[serde(default = "default_logs_datetime_format")]
    pub datetime_format: String,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Probe the signing agent and print its state
    Status,
    /// Ask the signing agent for access and print the active address
    Connect,
    /// Initialize the ticketing contract
    Initialize,
    /// Create a new event
    CreateEvent {
        /// Event name, reduced to a 9 characters symbol
        #[clap(long)]
        name: String,
        /// Event description, reduced to a 9 characters symbol
        #[clap(long)]
        description: String,
        /// Event date, RFC 3339 or local YYYY-MM-DDTHH:MM
        #[clap(long)]
        date: String,
        /// Number of tickets on sale
        #[clap(long)]
        total_tickets: u32,
        /// Price of a ticket in display units
        #[clap(long)]
        price: f64,
    },
    /// Purchase a ticket for an event
    PurchaseTicket {
        #[clap(long)]
        event_id: u32,
    },
    /// Transfer an owned ticket to another address
    TransferTicket {
        #[clap(long)]
        ticket_id: u32,
        #[clap(long)]
        to: String,
    },
    /// Check that a ticket belongs to an address
    VerifyTicket {
        #[clap(long)]
        ticket_id: u32,
        #[clap(long)]
        owner: String,
    },
}

#[derive(Parser, Serialize, Deserialize, Clone)]
#[clap(
    version = VERSION,
    about = "Tickets Wallet - Invoke the ticketing contract through an external signing agent"
)]
#[command(styles = tickets_common::get_cli_styles())]
pub struct Config {
    /// Network selected
    #[clap(long, value_enum, default_value_t = Network::Testnet)]
    #[serde(default)]
    pub network: Network,
    /// Ledger RPC endpoint
    /// By default, the public endpoint of the selected network
    #[clap(long)]
    pub rpc_url: Option<String>,
    /// Ticketing contract id
    #[clap(long)]
    pub contract_id: Option<String>,
    /// Signing agent endpoint
    #[clap(long, default_value_t = default_agent_address())]
    #[serde(default = "default_agent_address")]
    pub agent_address: String,
    /// Delay between two transaction status queries
    #[clap(long, default_value_t = DEFAULT_POLL_INTERVAL_MS)]
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Maximum number of transaction status queries
    #[clap(
        long,
        default_value_t = DEFAULT_MAX_POLL_ATTEMPTS,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    #[serde(default = "default_max_poll_attempts")]
    pub max_poll_attempts: u32,
    /// Maximum time spent waiting for a confirmation
    #[clap(long)]
    pub max_poll_duration_secs: Option<u64>,
    /// Inclusion fee offered for each transaction, in base units
    #[clap(long, default_value_t = BASE_FEE)]
    #[serde(default = "default_base_fee")]
    pub base_fee: u32,
    /// Validity window of each transaction
    #[clap(long, default_value_t = TRANSACTION_TIMEOUT_SECONDS)]
    #[serde(default = "default_tx_timeout_secs")]
    pub tx_timeout_secs: u64,
    /// Log configuration
    #[clap(flatten)]
    pub log: LogConfig,
    /// JSON File to load the configuration from
    #[clap(long)]
    #[serde(skip)]
    #[serde(default)]
    pub config_file: Option<String>,
    /// Generate the template at the `config_file` path
    #[clap(long)]
    #[serde(skip)]
    #[serde(default)]
    pub generate_config_template: bool,
    #[clap(subcommand)]
    #[serde(skip)]
    pub command: Option<Command>,
}

impl Config {
    pub fn rpc_url(&self) -> String {
        self.rpc_url
            .clone()
            .unwrap_or_else(|| self.network.default_rpc_url().to_owned())
    }

    pub fn invoker_config(&self) -> InvokerConfig {
        InvokerConfig {
            base_fee: self.base_fee,
            timeout: Duration::from_secs(self.tx_timeout_secs),
            poll: PollConfig {
                interval: Duration::from_millis(self.poll_interval_ms),
                max_attempts: self.max_poll_attempts,
                max_duration: self.max_poll_duration_secs.map(Duration::from_secs),
            },
        }
    }
}
