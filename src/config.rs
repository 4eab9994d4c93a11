//! Run configuration.
//!
//! A [`PipelineConfig`] is resolved once at startup (CLI flag, then
//! environment variable, then default) and handed to the components that
//! need it. Nothing reads the environment after that point.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::download::DOWNLOAD_TIMEOUT_SECS;
use crate::filter::{FilterError, PatternFilter, SCHEDULE_72HR_PATTERN};
use crate::http::RequestOptions;

/// Page scraped when no target is configured.
pub const DEFAULT_TARGET_URL: &str = "https://www.amc.af.mil/AMC-Travel-Site/Terminals/\
CONUS-Terminals/Baltimore-Washington-International-Airport-Passenger-Terminal/";

/// Store file used when no path is configured.
pub const DEFAULT_DB_FILE: &str = "ssa.db";

/// Download directory used when none is configured.
pub const DEFAULT_DOWNLOAD_DIR: &str = "pdf_downloads";

/// Default timeout for the discovery request, in seconds.
pub const DEFAULT_PAGE_TIMEOUT_SECS: u64 = 30;

/// Environment variable overriding the target page.
pub const ENV_TARGET_URL: &str = "PDF_WATCH_TARGET_URL";
/// Environment variable overriding the store file.
pub const ENV_DB_FILE: &str = "PDF_WATCH_DB_FILE";
/// Environment variable overriding the download directory.
pub const ENV_DOWNLOAD_DIR: &str = "PDF_WATCH_DOWNLOAD_DIR";

/// Errors raised while validating configuration, before any I/O.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The target URL could not be parsed.
    #[error("invalid target URL '{url}': {source}")]
    InvalidTargetUrl {
        /// The rejected URL text.
        url: String,
        /// The parse failure.
        #[source]
        source: url::ParseError,
    },

    /// The target URL is not an HTTP(S) URL with a host.
    #[error("target URL must be http(s) with a host: {url}")]
    UnsupportedTargetUrl {
        /// The rejected URL text.
        url: String,
    },

    /// A schedule pattern does not compile.
    #[error(transparent)]
    InvalidPattern(#[from] FilterError),

    /// A timeout of zero seconds was requested.
    #[error("{name} timeout must be at least one second")]
    ZeroTimeout {
        /// Which timeout was rejected.
        name: &'static str,
    },
}

/// Settings for one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Page scraped for PDF links.
    pub target_url: Url,
    /// Schedule patterns; a link is kept when any matches.
    pub patterns: Vec<String>,
    /// SQLite store file, used for every store operation in the run.
    pub db_path: PathBuf,
    /// Directory receiving downloaded PDFs.
    pub download_dir: PathBuf,
    /// Total timeout of the discovery request.
    pub page_timeout: Duration,
    /// Total timeout of each PDF download.
    pub download_timeout: Duration,
}

impl PipelineConfig {
    /// Builds a configuration for `target_url` with every other field defaulted.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `target_url` is not an absolute http(s) URL
    /// with a host.
    pub fn for_target(target_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            target_url: parse_target_url(target_url)?,
            patterns: vec![SCHEDULE_72HR_PATTERN.to_string()],
            db_path: PathBuf::from(DEFAULT_DB_FILE),
            download_dir: PathBuf::from(DEFAULT_DOWNLOAD_DIR),
            page_timeout: Duration::from_secs(DEFAULT_PAGE_TIMEOUT_SECS),
            download_timeout: Duration::from_secs(DOWNLOAD_TIMEOUT_SECS),
        })
    }

    /// Replaces the schedule patterns. An empty list keeps the default.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPattern`] for the first pattern that
    /// does not compile, so a bad pattern is rejected before any I/O.
    pub fn with_patterns(mut self, patterns: Vec<String>) -> Result<Self, ConfigError> {
        if !patterns.is_empty() {
            PatternFilter::case_insensitive(&patterns)?;
            self.patterns = patterns;
        }
        Ok(self)
    }

    /// Sets the store file.
    #[must_use]
    pub fn with_db_path(mut self, db_path: impl Into<PathBuf>) -> Self {
        self.db_path = db_path.into();
        self
    }

    /// Sets the download directory.
    #[must_use]
    pub fn with_download_dir(mut self, download_dir: impl Into<PathBuf>) -> Self {
        self.download_dir = download_dir.into();
        self
    }

    /// Sets both the page and download timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroTimeout`] for a zero duration.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, ConfigError> {
        if timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout { name: "request" });
        }
        self.page_timeout = timeout;
        self.download_timeout = timeout;
        Ok(self)
    }

    /// Request options for the discovery request.
    #[must_use]
    pub fn page_request_options(&self) -> RequestOptions {
        RequestOptions::browser_like(&self.target_url, self.page_timeout)
    }

    /// Request options for PDF downloads.
    #[must_use]
    pub fn download_request_options(&self) -> RequestOptions {
        RequestOptions::browser_like(&self.target_url, self.download_timeout)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            target_url: default_target_url(),
            patterns: vec![SCHEDULE_72HR_PATTERN.to_string()],
            db_path: PathBuf::from(DEFAULT_DB_FILE),
            download_dir: PathBuf::from(DEFAULT_DOWNLOAD_DIR),
            page_timeout: Duration::from_secs(DEFAULT_PAGE_TIMEOUT_SECS),
            download_timeout: Duration::from_secs(DOWNLOAD_TIMEOUT_SECS),
        }
    }
}

#[allow(clippy::expect_used)]
fn default_target_url() -> Url {
    Url::parse(DEFAULT_TARGET_URL).expect("default target URL is valid") // Static URL, safe to panic
}

/// Parses and validates a target page URL.
///
/// # Errors
///
/// Returns [`ConfigError`] for unparseable URLs, non-http(s) schemes and
/// URLs without a host.
pub fn parse_target_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|source| ConfigError::InvalidTargetUrl {
        url: raw.to_string(),
        source,
    })?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(ConfigError::UnsupportedTargetUrl {
            url: raw.to_string(),
        });
    }
    Ok(url)
}
