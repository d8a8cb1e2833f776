use anyhow::Result;
use bolsa::core::log::init_logging;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for bolsa::AppCommand {
    fn from(cmd: Commands) -> bolsa::AppCommand {
        match cmd {
            Commands::Dashboard { filter } => bolsa::AppCommand::Dashboard { filter },
            Commands::Export { output } => bolsa::AppCommand::Export { output },
            Commands::Chart { symbol } => bolsa::AppCommand::Chart { symbol },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Display the watchlist dashboard (default)
    Dashboard {
        /// Only show tickers containing this text (case-insensitive)
        #[arg(short, long)]
        filter: Option<String>,
    },
    /// Export the dashboard data to an .xlsx spreadsheet
    Export {
        /// Output file (defaults to datos_bolsa_<date>.xlsx)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show one year of prices with 50/200-session moving averages
    Chart {
        /// Ticker symbol, e.g. AAPL
        symbol: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => bolsa::cli::setup::setup(),
        Some(cmd) => bolsa::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            // No subcommand shows the dashboard.
            bolsa::run_command(
                bolsa::AppCommand::Dashboard { filter: None },
                cli.config_path.as_deref(),
            )
            .await
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
