use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use nerkh::cli::OutputFormat;
use nerkh::core::AssetCategory;
use nerkh::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    /// Print results as JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for nerkh::AppCommand {
    fn from(cmd: Commands) -> nerkh::AppCommand {
        match cmd {
            Commands::Currencies => nerkh::AppCommand::Prices(AssetCategory::Currency),
            Commands::Gold => nerkh::AppCommand::Prices(AssetCategory::Gold),
            Commands::Coins => nerkh::AppCommand::Prices(AssetCategory::Coin),
            Commands::Rates => nerkh::AppCommand::Rates,
            Commands::Convert { amount, from, to } => {
                nerkh::AppCommand::Convert { amount, from, to }
            }
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Display currency prices
    Currencies,
    /// Display gold prices
    Gold,
    /// Display coin prices
    Coins,
    /// Display currency rates against the base currency
    Rates,
    /// Convert an amount between two currencies
    Convert {
        amount: f64,
        /// Source currency key, e.g. usd
        from: String,
        /// Target currency key, e.g. eur
        to: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Table
    };

    let result = match cli.command {
        Some(Commands::Setup) => nerkh::cli::setup::setup(),
        Some(cmd) => nerkh::run_command(cmd.into(), cli.config_path.as_deref(), format).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
