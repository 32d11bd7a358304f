use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{error, info, warn};
use std::{fs::File, io::Write, path::Path, sync::Arc};
use tickets_common::{
    codec::{format_base_units, parse_datetime},
    contract::InvocationRequest,
    crypto::{Address, ContractId},
    logger::{setup_logger, LoggerOptions},
};
use tickets_wallet::{
    cancel::CancelToken,
    config::{Command, Config},
    context::NetworkContext,
    error::InvokeError,
    invoker::Invoker,
    ledger_api::RpcLedgerApi,
    poller::ConfirmationResult,
    signer::{RpcSigningAgent, SignerProbe, SignerState},
    ticketing,
};

#[tokio::main]
async fn main() -> Result<()> {
    let mut config: Config = Config::parse();
    if let Some(path) = config.config_file.as_ref() {
        if config.generate_config_template {
            if Path::new(path).exists() {
                eprintln!("Config file already exists at {}", path);
                return Ok(());
            }

            let mut file = File::create(path).context("Error while creating config file")?;
            let json = serde_json::to_string_pretty(&config)
                .context("Error while serializing config file")?;
            file.write_all(json.as_bytes())
                .context("Error while writing config file")?;
            println!("Config file template generated at {}", path);
            return Ok(());
        }

        let command = config.command.take();
        let file = File::open(path).context("Error while opening config file")?;
        config = serde_json::from_reader(file).context("Error while reading config file")?;
        config.command = command;
    } else if config.generate_config_template {
        eprintln!(
            "Provided config file path is required to generate the template with --config-file"
        );
        return Ok(());
    }

    let log_config = &config.log;
    setup_logger(LoggerOptions {
        level: log_config.log_level,
        file_level: log_config.file_log_level,
        disable_file_logging: log_config.disable_file_logging,
        disable_file_log_date_based: log_config.disable_file_log_date_based,
        disable_colors: log_config.disable_log_color,
        filename: &log_config.filename_log,
        logs_path: &log_config.logs_path,
        modules: &log_config.logs_modules,
        datetime_format: &log_config.datetime_format,
    })
    .context("Error while setting up the logger")?;

    let Some(command) = config.command.clone() else {
        bail!("No command provided, see --help");
    };

    let agent = RpcSigningAgent::new(config.agent_address.as_str())
        .context("Error while creating the signing agent client")?;
    let probe = Arc::new(SignerProbe::new(Arc::new(agent)));

    match command {
        Command::Status => {
            match probe.probe_installed().await {
                SignerState::Ready(address) => println!("Signing agent ready: {}", address),
                SignerState::Unauthorized => {
                    println!("Signing agent installed, access not granted (run connect)")
                }
                SignerState::NotInstalled | SignerState::Unknown => {
                    println!("No signing agent reachable at {}", config.agent_address)
                }
            }
            Ok(())
        }
        Command::Connect => {
            if let SignerState::NotInstalled = probe.probe_installed().await {
                bail!("No signing agent reachable at {}", config.agent_address);
            }
            let address = probe
                .request_authorization()
                .await
                .context("Error while requesting access")?;
            println!("Connected as {}", address);
            Ok(())
        }
        command => {
            let invoker = build_invoker(&config, probe)?;
            invoke(&invoker, command).await
        }
    }
}

fn build_invoker(config: &Config, probe: Arc<SignerProbe>) -> Result<Invoker> {
    let contract_id = config
        .contract_id
        .as_deref()
        .context("--contract-id is required to invoke the contract")?;
    let contract_id = ContractId::new(contract_id).context("Invalid contract id")?;

    let rpc_url = config.rpc_url();
    info!("Using {} on {} through {}", contract_id, config.network, rpc_url);
    let ledger = RpcLedgerApi::new(rpc_url).context("Error while creating the RPC client")?;

    Ok(Invoker::new(
        Arc::new(ledger),
        probe,
        NetworkContext::new(config.network, contract_id),
        config.invoker_config(),
    ))
}

fn request_for(command: Command, caller: Address) -> Result<InvocationRequest> {
    let request = match command {
        Command::Initialize => ticketing::initialize(caller)?,
        Command::CreateEvent {
            name,
            description,
            date,
            total_tickets,
            price,
        } => {
            let date = parse_datetime(&date).context("Invalid event date")?;
            ticketing::create_event(caller, &name, &description, &date, total_tickets, price)?
        }
        Command::PurchaseTicket { event_id } => ticketing::purchase_ticket(caller, event_id)?,
        Command::TransferTicket { ticket_id, to } => {
            let to = Address::new(to).context("Invalid recipient address")?;
            ticketing::transfer_ticket(caller, to, ticket_id)?
        }
        Command::VerifyTicket { ticket_id, owner } => {
            let owner = Address::new(owner).context("Invalid owner address")?;
            ticketing::verify_ticket(caller, ticket_id, owner)?
        }
        Command::Status | Command::Connect => bail!("Not a contract call"),
    };
    Ok(request)
}

async fn invoke(invoker: &Invoker, command: Command) -> Result<()> {
    let caller = invoker
        .signer()
        .refresh()
        .await
        .context("Signing agent is not ready (run connect)")?;
    let request = request_for(command, caller)?;

    let token = CancelToken::new();
    let handle = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Cancelling...");
            handle.cancel();
        }
    });

    match invoker.invoke_with_cancel(&request, &token).await {
        Ok(ConfirmationResult::Success(effects)) => {
            println!("Transaction {} succeeded", effects.hash);
            if let Some(ledger) = effects.ledger {
                println!("Ledger: {}", ledger);
            }
            if let Some(fee) = effects.fee_charged {
                println!("Fee charged: {}", format_base_units(fee as i128));
            }
            match effects.decode_return_value() {
                Ok(Some(value)) => println!("Returned: {}", value),
                Ok(None) => {}
                Err(e) => warn!("Cannot decode the returned value: {}", e),
            }
            Ok(())
        }
        Ok(ConfirmationResult::Failed(reason)) => bail!("Transaction failed: {}", reason),
        Ok(ConfirmationResult::TimedOut { hash }) => {
            println!(
                "Transaction {} not confirmed yet, query its status later instead of submitting again",
                hash
            );
            Ok(())
        }
        Err(InvokeError::Cancelled {
            transaction: Some(hash),
            ..
        }) => {
            println!(
                "Stopped waiting for {}, it may still be included by the network",
                hash
            );
            Ok(())
        }
        Err(e) => {
            if e.is_retryable() {
                error!("{} (it is safe to run the command again)", e);
            }
            Err(e.into())
        }
    }
}
