//! `jvc` command line tool.

mod parse_args;

use anyhow::{Context, Result};
use jvc_core::StatusField;
use jvc_emulator::{Emulator, EmulatorConfig};
use jvc_network::{ClientConfig, ProjectorClient};
use jvc_protocol::{Command, registry};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::parse_args::{AppArgs, Subcommand, parse_args};

#[tokio::main]
async fn main() -> Result<()> {
    let args = parse_args().context("invalid arguments")?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&args.log_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match &args.command {
        Subcommand::Commands => {
            list_commands();
            Ok(())
        }
        Subcommand::Emulator { .. } => run_emulator(&args).await,
        _ => run_client(&args).await,
    }
}

fn list_commands() {
    for meta in registry().iter() {
        println!("{:<40} {}", meta.name(), meta.description());
    }
}

fn client_config(args: &AppArgs) -> Result<ClientConfig> {
    let mut config = ClientConfig::from_env().context("invalid JVC_PROJECTOR_* environment")?;
    if let Some(host) = &args.host {
        config.host = Some(host.clone());
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(password) = &args.password {
        config.password = Some(password.clone());
    }
    if let Some(timeout) = args.timeout {
        config.timeout = timeout;
    }
    Ok(config)
}

async fn run_client(args: &AppArgs) -> Result<()> {
    let config = client_config(args)?;
    let client = ProjectorClient::connect(&config)
        .await
        .context("failed to connect to projector")?;

    match &args.command {
        Subcommand::Status => {
            println!("Power:       {}", client.power_status().await?);
            for field in [
                StatusField::Input,
                StatusField::GammaTable,
                StatusField::GammaValue,
                StatusField::Source,
            ] {
                match client.status(field).await {
                    Ok(value) => println!("{:<12} {value}", format!("{field}:")),
                    Err(e) => println!("{:<12} unavailable ({e})", format!("{field}:")),
                }
            }
            match client.model_status().await {
                Ok(model) => println!("Model:       {model}"),
                Err(e) => println!("Model:       unknown ({e})"),
            }
        }
        Subcommand::On { wait } => {
            let state = client.power_on(*wait, None).await?;
            println!("{state}");
        }
        Subcommand::Off { wait } => {
            let state = client.power_off(*wait, None).await?;
            println!("{state}");
        }
        Subcommand::Cmd { name, payload } => {
            let payload = match payload {
                Some(payload) => hex::decode(payload).context("payload must be hex")?,
                None => Vec::new(),
            };
            let command = Command::from_name(name, &payload)?;
            let response = client.transact(&command).await?;
            match response.response_str() {
                Some(value) => println!("{value}"),
                None if response.is_advanced() => println!("{}", hex::encode(response.payload())),
                None => println!("OK"),
            }
        }
        Subcommand::Commands | Subcommand::Emulator { .. } => {}
    }

    client.shutdown();
    client.wait().await?;
    Ok(())
}

async fn run_emulator(args: &AppArgs) -> Result<()> {
    let Subcommand::Emulator {
        bind,
        model,
        warmup,
    } = &args.command
    else {
        return Ok(());
    };

    let mut config = EmulatorConfig {
        password: args.password.clone(),
        ..Default::default()
    };
    if let Some(bind) = bind {
        config.bind_addr = *bind;
    }
    if let Some(model) = model {
        config.model = model.clone();
    }
    if let Some(warmup) = warmup {
        config.warmup_time = *warmup;
    }

    let emulator = Emulator::start(config).await.context("failed to start emulator")?;
    println!(
        "Emulating {} on {} (Ctrl-C to stop)",
        emulator.model(),
        emulator.local_addr()
    );

    tokio::signal::ctrl_c().await?;
    info!("Interrupted");
    emulator.shutdown();
    emulator.wait().await;
    Ok(())
}
