//! keyprobe - verify exchange credentials and connectivity
//!
//! ```bash
//! keyprobe
//! keyprobe --env-file deploy/.env --json
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use keyprobe_core::prelude::*;
use keyprobe_exchanges::BinanceConnector;
use keyprobe_validator::{ConnectivityValidator, USAGE};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

const RULE: &str = "==================================================";

#[derive(Parser, Debug)]
#[command(name = "keyprobe")]
#[command(about = "Validate Binance API credentials against the testnet or production")]
#[command(version)]
#[command(after_help = USAGE)]
struct Cli {
    /// Read settings from this dotenv file instead of ./.env
    #[arg(long, value_name = "PATH")]
    env_file: Option<PathBuf>,

    /// Print the outcome as JSON on stdout when the run is over
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[monoio::main(timer_enabled = true)]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging();

    let config = match &cli.env_file {
        Some(path) => Configuration::from_env_file(path),
        None => Configuration::from_env(),
    }
    .context("failed to load configuration")?;

    info!("{RULE}");
    info!("🚀 keyprobe: exchange connectivity check");
    info!("{RULE}");

    let validator = ConnectivityValidator::new(BinanceConnector::new());
    let outcome = validator.validate(&config).await;

    info!("{RULE}");
    if outcome.success {
        info!("✅ Validation passed ({})", outcome.run_id);
    } else {
        error!("❌ Validation failed ({})", outcome.run_id);
    }

    if cli.json {
        let json = serde_json::to_string_pretty(&outcome).context("failed to serialize outcome")?;
        println!("{json}");
    }

    Ok(if outcome.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
