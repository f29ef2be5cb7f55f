pub mod cli;
pub mod core;
pub mod providers;

pub use crate::core::config;

use crate::core::config::AppConfig;
use crate::providers::http_page::HttpPageFetcher;
use crate::providers::util::RequestPolicy;
use crate::providers::yahoo_finance::YahooFinanceProvider;
use anyhow::Result;
use std::path::PathBuf;
use tracing::{debug, info};

pub enum AppCommand {
    /// Render a price and revenue chart for each company
    Chart { output_dir: Option<PathBuf> },
    /// Print the scraped revenue tables
    Revenue,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("revchart starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");
    config.check_shared_revenue_urls();

    let policy = RequestPolicy::from(&config.http);
    let page_fetcher = HttpPageFetcher::new(policy);

    match command {
        AppCommand::Chart { output_dir } => {
            let price_provider = YahooFinanceProvider::new(config.yahoo_base_url(), policy);
            let output_dir = output_dir.or_else(|| config.output_dir.as_ref().map(PathBuf::from));
            let saved = cli::chart::run(
                &config,
                &page_fetcher,
                &price_provider,
                output_dir.as_deref(),
            )
            .await?;
            debug!(charts = saved.len(), "Saved charts");
            Ok(())
        }
        AppCommand::Revenue => cli::revenue::run(&config, &page_fetcher).await,
    }
}
