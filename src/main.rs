//! CLI entry point for pdf-watch.

use anyhow::{Context, Result};
use clap::Parser;
use pdf_watch_core::{Pipeline, SeenPdfStore};
use tracing::{debug, info, warn};

mod cli;

use cli::Args;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load .env before parsing so env-backed flags see its values
    let dotenv_result = dotenvy::dotenv();

    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    match dotenv_result {
        Ok(path) => debug!(path = %path.display(), "loaded .env file"),
        Err(e) if e.not_found() => info!("No .env file found"),
        Err(e) => warn!(error = %e, "could not load .env file"),
    }

    debug!(?args, "CLI arguments parsed");

    let config = args.to_config()?;
    let store = SeenPdfStore::initialize(&config.db_path).await?;

    if args.list {
        let records = store.list().await?;
        if records.is_empty() {
            println!("No PDFs recorded in {}", config.db_path.display());
        }
        for record in records {
            println!(
                "{}  {}  {}",
                record.first_seen_utc.format("%Y-%m-%d %H:%M:%S UTC"),
                record.hash,
                record.source_url
            );
        }
        store.close().await;
        return Ok(());
    }

    tokio::fs::create_dir_all(&config.download_dir)
        .await
        .with_context(|| {
            format!(
                "failed to create download directory {}",
                config.download_dir.display()
            )
        })?;

    info!(
        target_url = %config.target_url,
        db = %config.db_path.display(),
        download_dir = %config.download_dir.display(),
        "pdf-watch starting"
    );

    let pipeline = Pipeline::new(config, store.clone())?;
    let report = pipeline.run().await?;

    info!(
        discovered = report.discovered,
        matched = report.matched,
        downloaded = report.downloaded(),
        new = report.new_records(),
        duplicates = report.duplicates(),
        failed = report.failures(),
        "Run complete"
    );

    store.close().await;
    Ok(())
}
