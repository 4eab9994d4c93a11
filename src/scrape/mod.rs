//! PDF link discovery on a single HTML page.
//!
//! [`LinkExtractor::extract`] performs one GET, parses the body, and returns
//! the absolute URL of every `<a href>` whose resolved path ends in `.pdf`,
//! in document order. The suffix check is case-sensitive and looks at the
//! URL path only, so `a.pdf?download=1` matches and `/x/b.PDF` does not.
//!
//! Failures are logged here and returned as [`ScrapeError`];
//! [`LinkExtractor::extract_or_empty`] folds them into an empty list.

mod error;

pub use error::ScrapeError;

use std::sync::LazyLock;

use reqwest::Client;
use scraper::{Html, Selector};
use tracing::{debug, error, info, instrument, warn};
use url::Url;

use crate::http::{RequestOptions, build_http_client};

/// Anchors carrying an `href` attribute.
#[allow(clippy::expect_used)]
static ANCHOR_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("a[href]").expect("anchor selector is valid") // Static selector, safe to panic
});

/// Path suffix identifying a PDF link.
const PDF_SUFFIX: &str = ".pdf";

/// Fetches a page and extracts its PDF links.
#[derive(Debug, Clone)]
pub struct LinkExtractor {
    client: Client,
}

impl LinkExtractor {
    /// Creates an extractor whose requests carry `options`.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::ClientBuild`] if the HTTP client cannot be built.
    pub fn new(options: &RequestOptions) -> Result<Self, ScrapeError> {
        let client = build_http_client(options).map_err(ScrapeError::ClientBuild)?;
        Ok(Self { client })
    }

    /// Fetches `page_url` and returns its PDF links in document order.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError`] for invalid URLs, network failures, timeouts,
    /// non-success statuses and unreadable bodies. The failure has already
    /// been logged when this returns.
    #[instrument(skip(self), fields(url = %page_url))]
    pub async fn extract(&self, page_url: &str) -> Result<Vec<String>, ScrapeError> {
        info!("scraping PDF links");
        let result = self.fetch_and_extract(page_url).await;
        match &result {
            Ok(links) => info!(count = links.len(), "found PDF link(s)"),
            Err(e) => log_scrape_failure(e),
        }
        result
    }

    /// Like [`extract`](Self::extract), but a failed fetch yields no links.
    ///
    /// The caller cannot tell a failed fetch from a page without PDFs.
    pub async fn extract_or_empty(&self, page_url: &str) -> Vec<String> {
        self.extract(page_url).await.unwrap_or_default()
    }

    async fn fetch_and_extract(&self, page_url: &str) -> Result<Vec<String>, ScrapeError> {
        let base = Url::parse(page_url).map_err(|_| ScrapeError::invalid_url(page_url))?;

        let response = self
            .client
            .get(base.clone())
            .send()
            .await
            .map_err(|e| ScrapeError::from_send(page_url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::http_status(page_url, status));
        }
        debug!(status = status.as_u16(), "fetched page");

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                ScrapeError::from_send(page_url, e)
            } else {
                ScrapeError::Body {
                    url: page_url.to_string(),
                    source: e,
                }
            }
        })?;

        Ok(extract_pdf_links(&body, &base))
    }
}

/// Extracts absolute PDF link URLs from `html`, resolving against `base`.
///
/// Anchors without `href`, unresolvable hrefs and non-HTTP(S) schemes are
/// skipped. Duplicates are kept.
#[must_use]
pub fn extract_pdf_links(html: &str, base: &Url) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut links = Vec::new();

    for anchor in document.select(&ANCHOR_SELECTOR) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let Ok(resolved) = base.join(href.trim()) else {
            debug!(href, "skipping unresolvable href");
            continue;
        };
        if !matches!(resolved.scheme(), "http" | "https") {
            continue;
        }
        if is_pdf_url(&resolved) {
            debug!(url = %resolved, "found PDF");
            links.push(resolved.to_string());
        }
    }

    links
}

/// True when the URL path (not query or fragment) ends in `.pdf`.
#[must_use]
pub fn is_pdf_url(url: &Url) -> bool {
    url.path().ends_with(PDF_SUFFIX)
}

fn log_scrape_failure(error: &ScrapeError) {
    match error {
        ScrapeError::Network { url, source } => {
            warn!(url = %url, error = %source, "request for page failed");
        }
        ScrapeError::Timeout { url } => {
            warn!(url = %url, "request for page timed out");
        }
        ScrapeError::HttpStatus {
            url,
            status,
            reason,
        } => {
            warn!(url = %url, status, reason = %reason, "HTTP error fetching page");
        }
        ScrapeError::InvalidUrl { .. }
        | ScrapeError::Body { .. }
        | ScrapeError::ClientBuild(_) => {
            error!(error = ?error, "unexpected error while scraping page");
        }
    }
}
