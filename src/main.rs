//! CLI entry point for the homebrew catalog scraper.

use anyhow::{Context, Result};
use clap::Parser;
use homebrew_catalog::{CatalogScraper, write_catalog};
use tracing::{debug, info};

mod app_config;
mod cli;
mod output;

use cli::Args;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(args.default_log_level()));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    debug!(?args, "CLI arguments parsed");

    let loaded = app_config::load_config(args.config.as_deref())?;
    if let (Some(path), Some(_)) = (&loaded.path, &loaded.config) {
        debug!(path = %path.display(), "Loaded config file");
    }
    let settings = app_config::resolve_settings(&args, loaded.config.as_ref());
    settings
        .scraper
        .validate()
        .context("Invalid scraper configuration")?;

    info!(
        collection = %settings.scraper.collection,
        base_url = %settings.scraper.base_url,
        output = %settings.output.display(),
        "Homebrew catalog starting"
    );

    let scraper = CatalogScraper::new(settings.scraper)?;
    let report = scraper.run().await;

    write_catalog(&report.catalog, &settings.output).with_context(|| {
        format!(
            "Failed to write catalog to '{}'",
            settings.output.display()
        )
    })?;

    output::print_summary(&report, &settings.output, args.quiet);
    Ok(())
}
