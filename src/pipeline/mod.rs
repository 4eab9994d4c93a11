//! One-shot schedule watch run.
//!
//! Stages run strictly in order: discover links on the target page, filter
//! them by schedule pattern, download every match, then identify (hash) and
//! record each artifact. Per-item failures are reported and skipped; a store
//! failure aborts the run and leaves already-downloaded files on disk.

mod report;

pub use report::{ItemOutcome, ItemReport, RunReport};

use std::path::PathBuf;

use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::config::PipelineConfig;
use crate::download::{DownloadError, Downloader, unique_pdf_path};
use crate::filter::{FilterError, PatternFilter};
use crate::hash::file_digest;
use crate::scrape::{LinkExtractor, ScrapeError};
use crate::store::{SeenPdfRepository, StoreError};

/// Fatal errors for a run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A schedule pattern did not compile.
    #[error(transparent)]
    Filter(#[from] FilterError),

    /// The page client could not be constructed.
    #[error(transparent)]
    Scrape(#[from] ScrapeError),

    /// The download client could not be constructed.
    #[error(transparent)]
    Download(#[from] DownloadError),

    /// Reading or writing the dedup store failed.
    #[error("dedup store failure: {0}")]
    Store(#[from] StoreError),
}

/// Extract, filter, download, hash and record, once.
pub struct Pipeline<R> {
    config: PipelineConfig,
    extractor: LinkExtractor,
    filter: PatternFilter,
    downloader: Downloader,
    repository: R,
}

impl<R: SeenPdfRepository> Pipeline<R> {
    /// Builds the pipeline components from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError`] for invalid patterns or HTTP clients that
    /// cannot be built. No network or store I/O happens here.
    pub fn new(config: PipelineConfig, repository: R) -> Result<Self, PipelineError> {
        let extractor = LinkExtractor::new(&config.page_request_options())?;
        let downloader = Downloader::new(&config.download_request_options())?;
        let filter = PatternFilter::case_insensitive(&config.patterns)?;
        Ok(Self::from_parts(
            config, extractor, filter, downloader, repository,
        ))
    }

    /// Assembles a pipeline from prebuilt components.
    #[must_use]
    pub fn from_parts(
        config: PipelineConfig,
        extractor: LinkExtractor,
        filter: PatternFilter,
        downloader: Downloader,
        repository: R,
    ) -> Self {
        Self {
            config,
            extractor,
            filter,
            downloader,
            repository,
        }
    }

    /// Runs every stage once and reports per-link outcomes.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Store`] if an existence check or insert
    /// fails. Network and filesystem failures for individual links are
    /// reported in the [`RunReport`] instead.
    #[instrument(skip(self), fields(target_url = %self.config.target_url))]
    pub async fn run(&self) -> Result<RunReport, PipelineError> {
        let mut report = RunReport::default();

        // Discover
        let links = match self.extractor.extract(self.config.target_url.as_str()).await {
            Ok(links) => links,
            Err(_) => {
                report.discovery_failed = true;
                Vec::new()
            }
        };
        report.discovered = links.len();

        // Filter
        let matched = self.filter.filter(&links[..]);
        report.matched = matched.len();
        info!(
            discovered = report.discovered,
            matched = report.matched,
            "filtered PDF links"
        );

        // Fetch
        let mut fetched: Vec<(String, Result<PathBuf, DownloadError>)> =
            Vec::with_capacity(matched.len());
        for url in matched {
            let dest = unique_pdf_path(&self.config.download_dir);
            let result = self.downloader.download(&url, &dest).await;
            fetched.push((url, result));
        }

        // Identify and record
        for (url, result) in fetched {
            let outcome = match result {
                Err(e) => ItemOutcome::DownloadFailed {
                    reason: e.to_string(),
                },
                Ok(path) => self.identify_and_record(&url, path).await?,
            };
            report.items.push(ItemReport { url, outcome });
        }

        info!(
            new = report.new_records(),
            duplicates = report.duplicates(),
            failures = report.failures(),
            "run complete"
        );
        Ok(report)
    }

    async fn identify_and_record(
        &self,
        url: &str,
        path: PathBuf,
    ) -> Result<ItemOutcome, PipelineError> {
        let hash = match file_digest(&path).await {
            Ok(hash) => hash,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not read downloaded PDF back");
                return Ok(ItemOutcome::ReadFailed {
                    path,
                    reason: e.to_string(),
                });
            }
        };

        if self.repository.exists(&hash).await? {
            info!(hash = %hash, url, "schedule PDF already known");
            return Ok(ItemOutcome::Duplicate { hash, path });
        }

        if self.repository.insert(&hash, url).await? {
            info!(hash = %hash, url, path = %path.display(), "new schedule PDF recorded");
            Ok(ItemOutcome::New { hash, path })
        } else {
            info!(hash = %hash, url, "schedule PDF already known");
            Ok(ItemOutcome::Duplicate { hash, path })
        }
    }
}
