//! `rifa` - raffle storefront and admin panel on the command line

mod cli;
mod commands;
mod config;
mod output;

use anyhow::{Context, Result};
use config::{AppConfig, LogFormat, LoggingConfig};
use output::Output;
use rifa_core::RaffleService;
use rifa_store::FileStorage;
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Log filter variable, takes precedence over flags and config
const LOG_ENV: &str = "RIFA_LOG";

fn init_tracing(logging: &LoggingConfig, cli_level: Option<&str>) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(cli_level.unwrap_or(&logging.level)))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let (plain, json) = match logging.format {
        LogFormat::Plain => (
            Some(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            ),
            None,
        ),
        LogFormat::Json => (
            None,
            Some(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            ),
        ),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(plain)
        .with(json)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli::build().get_matches();

    let mut config = AppConfig::load(matches.get_one::<PathBuf>("config").map(PathBuf::as_path))?;
    if let Some(dir) = matches.get_one::<PathBuf>("data-dir") {
        config.storage.data_dir.clone_from(dir);
    }
    init_tracing(
        &config.logging,
        matches.get_one::<String>("log-level").map(String::as_str),
    );

    let storage = FileStorage::open(&config.storage.data_dir).with_context(|| {
        format!(
            "failed to open data directory {}",
            config.storage.data_dir.display()
        )
    })?;
    let service = RaffleService::new(storage).context("failed to open raffle store")?;
    tracing::debug!(data_dir = %config.storage.data_dir.display(), "store opened");

    let out = Output::new(matches.get_flag("json"));
    commands::dispatch(&service, &config, &matches, out).await
}
