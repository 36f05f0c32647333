pub mod cli;
pub mod core;
pub mod providers;

use crate::cli::OutputFormat;
use crate::core::config::AppConfig;
use crate::core::{AssetCategory, PriceService};
use anyhow::Result;
use tracing::{debug, info};

pub enum AppCommand {
    Prices(AssetCategory),
    Rates,
    Convert { amount: f64, from: String, to: String },
}

pub async fn run_command(
    command: AppCommand,
    config_path: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    info!("nerkh starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let service = PriceService::from_config(&config)?;

    match command {
        AppCommand::Prices(category) => cli::prices::run(&service, category, format).await,
        AppCommand::Rates => cli::rates::run(&service, format).await,
        AppCommand::Convert { amount, from, to } => {
            cli::rates::run_convert(&service, amount, &from, &to, format).await
        }
    }
}
