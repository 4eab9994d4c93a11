//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use pdf_watch_core::config::{
    ConfigError, DEFAULT_DB_FILE, DEFAULT_DOWNLOAD_DIR, DEFAULT_PAGE_TIMEOUT_SECS,
    DEFAULT_TARGET_URL, ENV_DB_FILE, ENV_DOWNLOAD_DIR, ENV_TARGET_URL, PipelineConfig,
};

/// Watch a terminal page for new schedule PDFs.
///
/// Scrapes the target page once, downloads PDFs whose URL matches a schedule
/// pattern, and records each previously unseen file by content hash.
#[derive(Parser, Debug)]
#[command(name = "pdf-watch")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Page to scrape for PDF links
    #[arg(short = 'u', long, env = ENV_TARGET_URL, default_value = DEFAULT_TARGET_URL)]
    pub target_url: String,

    /// Schedule pattern (case-insensitive regex); repeatable, defaults to "72hr"
    #[arg(short = 'p', long = "pattern", value_name = "REGEX")]
    pub patterns: Vec<String>,

    /// SQLite file recording seen PDFs
    #[arg(long, env = ENV_DB_FILE, default_value = DEFAULT_DB_FILE)]
    pub db_path: PathBuf,

    /// Directory receiving downloaded PDFs
    #[arg(short = 'o', long, env = ENV_DOWNLOAD_DIR, default_value = DEFAULT_DOWNLOAD_DIR)]
    pub download_dir: PathBuf,

    /// Per-request timeout in seconds (1-600)
    #[arg(short = 't', long, default_value_t = DEFAULT_PAGE_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..=600))]
    pub timeout: u64,

    /// Print recorded PDFs and exit without scraping
    #[arg(long)]
    pub list: bool,
}

impl Args {
    /// Resolves the run configuration from parsed arguments.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the target URL or a pattern is unusable.
    pub fn to_config(&self) -> Result<PipelineConfig, ConfigError> {
        PipelineConfig::for_target(&self.target_url)?
            .with_patterns(self.patterns.clone())?
            .with_db_path(&self.db_path)
            .with_download_dir(&self.download_dir)
            .with_timeout(Duration::from_secs(self.timeout))
    }
}
