//! Rasid exporter
//!
//! Reads a JSON record snapshot, renders the requested report and delivers
//! it to the configured storage.

mod cli;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rasid_core::export::ExportPipeline;
use rasid_core::formatting::FormatConfig;
use rasid_core::payment::RecordSnapshot;
use rasid_core::storage::{StorageConfig, StorageService};
use rasid_shared::{AppConfig, AppError};

use crate::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Logs go to stderr; stdout carries the delivered URL
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rasid=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Unsupported formats are rejected here, before any records are read
    let cli = Cli::parse();

    let config = AppConfig::load().context("failed to load configuration")?;
    let format = FormatConfig::from_settings(&config.formatting)
        .context("invalid formatting settings")?;
    let storage = StorageService::from_config(StorageConfig::from_settings(&config.storage))
        .context("failed to initialize storage")?;
    info!(
        provider = storage.provider_name(),
        bucket = storage.bucket(),
        "storage configured"
    );

    let json = tokio::fs::read_to_string(&cli.records)
        .await
        .with_context(|| format!("failed to read {}", cli.records.display()))?;
    let snapshot = RecordSnapshot::from_json(&json).context("records must be a JSON array")?;

    let options = cli.options(&config.report);
    let pipeline = ExportPipeline::new(format, storage);

    let outcome = match pipeline
        .export(&snapshot, &cli.report_type, cli.format.extension(), &options)
        .await
    {
        Ok(outcome) => outcome,
        Err(err) => {
            let err = AppError::from(err);
            error!(code = err.error_code(), "{err}");
            return Err(err.into());
        }
    };

    println!("{}", outcome.url);
    println!("warnings: {}", outcome.warning_count());

    Ok(())
}
