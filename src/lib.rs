pub mod cli;
pub mod core;
pub mod providers;

use crate::core::cache::Cache;
use crate::core::config::AppConfig;
use crate::core::metrics::{Aggregator, MetricsTable};
use anyhow::Result;
use providers::yahoo_finance::{YahooHistoryProvider, YahooMetadataProvider};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

/// Commands the application can execute, decoupled from the clap surface.
#[derive(Debug, Clone)]
pub enum AppCommand {
    Dashboard { filter: Option<String> },
    Export { output: Option<PathBuf> },
    Chart { symbol: String },
}

async fn aggregate_with_progress(
    config: &AppConfig,
    history_provider: &YahooHistoryProvider,
    metadata_provider: &YahooMetadataProvider,
    cache: &Cache<Vec<String>, MetricsTable>,
) -> MetricsTable {
    let aggregator = Aggregator::new(history_provider, metadata_provider, cache);

    let pb = cli::ui::new_progress_bar(config.tickers.len() as u64, true);
    pb.set_message("Obteniendo datos...");
    let table = aggregator.aggregate(&config.tickers, &|| pb.inc(1)).await;
    pb.finish_and_clear();

    table
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Bolsa dashboard starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let base_url = config.yahoo_base_url();
    let history_provider = YahooHistoryProvider::new(base_url);
    let metadata_provider = YahooMetadataProvider::new(base_url);
    let cache = Cache::new(Duration::from_secs(config.cache_ttl_secs));

    match command {
        AppCommand::Dashboard { filter } => {
            let table =
                aggregate_with_progress(&config, &history_provider, &metadata_provider, &cache)
                    .await;
            cli::dashboard::run(&table, filter.as_deref());
            Ok(())
        }
        AppCommand::Export { output } => {
            let table =
                aggregate_with_progress(&config, &history_provider, &metadata_provider, &cache)
                    .await;
            cli::export::run(&table, output.as_deref())
        }
        AppCommand::Chart { symbol } => cli::chart::run(&symbol, &history_provider).await,
    }
}
