//! Streaming PDF downloader.
//!
//! [`Downloader::download`] writes the response body to a caller-chosen path
//! chunk by chunk, so memory use does not grow with file size.

use std::path::{Path, PathBuf};
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::Client;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, error, info, instrument, warn};
use url::Url;
use uuid::Uuid;

use super::constants::{DOWNLOAD_TIMEOUT_SECS, PDF_EXTENSION};
use super::error::DownloadError;
use crate::http::{RequestOptions, build_http_client};

/// Default total timeout for one download.
pub const DEFAULT_DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(DOWNLOAD_TIMEOUT_SECS);

/// Streams remote resources to local files.
///
/// Create once and reuse for every download in a run so connections pool.
#[derive(Debug, Clone)]
pub struct Downloader {
    client: Client,
}

impl Downloader {
    /// Creates a downloader whose requests carry `options`.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::ClientBuild`] if the HTTP client cannot be built.
    pub fn new(options: &RequestOptions) -> Result<Self, DownloadError> {
        let client = build_http_client(options).map_err(DownloadError::ClientBuild)?;
        Ok(Self { client })
    }

    /// Downloads `url` to `dest`, creating missing parent directories.
    ///
    /// Redirects are followed. On an HTTP error status no file is created;
    /// if the body stream fails midway the partial file is removed.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError`] for invalid URLs, network failures,
    /// timeouts, non-success statuses and filesystem errors. The failure has
    /// already been logged when this returns; callers skip the item.
    #[must_use = "download result contains the path to the downloaded file"]
    #[instrument(skip(self, dest), fields(url = %url, dest = %dest.display()))]
    pub async fn download(&self, url: &str, dest: &Path) -> Result<PathBuf, DownloadError> {
        info!("starting PDF download");
        let result = self.download_inner(url, dest).await;
        if let Err(e) = &result {
            log_download_failure(e);
        }
        result
    }

    async fn download_inner(&self, url: &str, dest: &Path) -> Result<PathBuf, DownloadError> {
        let parsed_url = Url::parse(url).map_err(|_| DownloadError::invalid_url(url))?;

        let response = self
            .client
            .get(parsed_url)
            .send()
            .await
            .map_err(|e| DownloadError::network(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::http_status(url, status));
        }

        if let Some(parent) = dest.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| DownloadError::io(parent, e))?;
        }

        let mut file = File::create(dest)
            .await
            .map_err(|e| DownloadError::io(dest, e))?;

        let stream_result = stream_to_file(&mut file, response, url, dest).await;
        drop(file);

        let bytes_written = match stream_result {
            Ok(bytes) => bytes,
            Err(e) => {
                debug!(path = %dest.display(), "cleaning up partial file after error");
                let _ = tokio::fs::remove_file(dest).await;
                return Err(e);
            }
        };

        info!(path = %dest.display(), bytes = bytes_written, "saved PDF");
        Ok(dest.to_path_buf())
    }
}

/// Returns `<dir>/<uuid-v4>.pdf`, a fresh path for each call.
#[must_use]
pub fn unique_pdf_path(dir: &Path) -> PathBuf {
    dir.join(format!("{}.{PDF_EXTENSION}", Uuid::new_v4()))
}

/// Streams response body to file, returning bytes written.
///
/// Separate from the caller so the caller can clean up on error.
async fn stream_to_file(
    file: &mut File,
    response: reqwest::Response,
    url: &str,
    file_path: &Path,
) -> Result<u64, DownloadError> {
    let mut writer = BufWriter::new(file);
    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| DownloadError::network(url, e))?;

        writer
            .write_all(&chunk)
            .await
            .map_err(|e| DownloadError::io(file_path.to_path_buf(), e))?;

        bytes_written += chunk.len() as u64;
    }

    writer
        .flush()
        .await
        .map_err(|e| DownloadError::io(file_path.to_path_buf(), e))?;

    Ok(bytes_written)
}

fn log_download_failure(error: &DownloadError) {
    match error {
        DownloadError::Network { url, source } => {
            warn!(url = %url, error = %source, "network error while downloading PDF");
        }
        DownloadError::Timeout { url } => {
            warn!(url = %url, "timed out while downloading PDF");
        }
        DownloadError::HttpStatus {
            url,
            status,
            reason,
        } => {
            warn!(url = %url, status, reason = %reason, "HTTP error while downloading PDF");
        }
        DownloadError::Io { .. }
        | DownloadError::InvalidUrl { .. }
        | DownloadError::ClientBuild(_) => {
            error!(error = ?error, "unexpected error while downloading PDF");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use crate::test_support::socket_guard::start_mock_server_or_skip;
    use tempfile::TempDir;
    use wiremock::matchers::{header, header_exists, headers, method, path};
    use wiremock::{Mock, ResponseTemplate};

    fn downloader_for(uri: &str, timeout: Duration) -> Downloader {
        let target = Url::parse(uri).unwrap();
        Downloader::new(&RequestOptions::browser_like(&target, timeout)).unwrap()
    }

    #[test]
    fn test_unique_pdf_path_is_uuid_named_and_distinct() {
        let dir = Path::new("pdf_downloads");
        let first = unique_pdf_path(dir);
        let second = unique_pdf_path(dir);

        assert_ne!(first, second);
        assert_eq!(first.parent().unwrap(), dir);
        assert_eq!(first.extension().unwrap(), "pdf");
        let stem = first.file_stem().unwrap().to_str().unwrap();
        assert!(Uuid::parse_str(stem).is_ok(), "stem should be a UUID: {stem}");
    }

    #[tokio::test]
    async fn test_download_writes_exact_bytes_and_returns_dest() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        let temp_dir = TempDir::new().unwrap();

        Mock::given(method("GET"))
            .and(path("/72hr.pdf"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF-1.7 schedule"))
            .mount(&mock_server)
            .await;

        let url = format!("{}/72hr.pdf", mock_server.uri());
        let dest = temp_dir.path().join("out.pdf");
        let result = downloader_for(&url, DEFAULT_DOWNLOAD_TIMEOUT)
            .download(&url, &dest)
            .await;

        assert_eq!(result.unwrap(), dest);
        assert_eq!(std::fs::read(&dest).unwrap(), b"%PDF-1.7 schedule");
    }

    #[tokio::test]
    async fn test_download_creates_missing_parent_directories() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        let temp_dir = TempDir::new().unwrap();

        Mock::given(method("GET"))
            .and(path("/a.pdf"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"pdf"))
            .mount(&mock_server)
            .await;

        let url = format!("{}/a.pdf", mock_server.uri());
        let dest = temp_dir.path().join("nested").join("deeper").join("a.pdf");
        downloader_for(&url, DEFAULT_DOWNLOAD_TIMEOUT)
            .download(&url, &dest)
            .await
            .unwrap();

        assert!(dest.exists());
    }

    #[tokio::test]
    async fn test_download_404_returns_error_and_creates_no_file() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        let temp_dir = TempDir::new().unwrap();

        Mock::given(method("GET"))
            .and(path("/missing.pdf"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let url = format!("{}/missing.pdf", mock_server.uri());
        let dest = temp_dir.path().join("sub").join("missing.pdf");
        let result = downloader_for(&url, DEFAULT_DOWNLOAD_TIMEOUT)
            .download(&url, &dest)
            .await;

        match result {
            Err(DownloadError::HttpStatus { status, reason, .. }) => {
                assert_eq!(status, 404);
                assert_eq!(reason, "Not Found");
            }
            other => panic!("Expected HttpStatus error, got: {other:?}"),
        }
        let entries: Vec<_> = std::fs::read_dir(temp_dir.path()).unwrap().collect();
        assert!(entries.is_empty(), "no file or dir after 404: {entries:?}");
    }

    #[tokio::test]
    async fn test_download_500_returns_http_status() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        let temp_dir = TempDir::new().unwrap();

        Mock::given(method("GET"))
            .and(path("/error.pdf"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let url = format!("{}/error.pdf", mock_server.uri());
        let result = downloader_for(&url, DEFAULT_DOWNLOAD_TIMEOUT)
            .download(&url, &temp_dir.path().join("e.pdf"))
            .await;

        assert!(matches!(
            result,
            Err(DownloadError::HttpStatus { status: 500, .. })
        ));
    }

    #[tokio::test]
    async fn test_download_follows_redirects() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        let temp_dir = TempDir::new().unwrap();

        Mock::given(method("GET"))
            .and(path("/old.pdf"))
            .respond_with(
                ResponseTemplate::new(302)
                    .insert_header("Location", format!("{}/new.pdf", mock_server.uri())),
            )
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/new.pdf"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"moved"))
            .mount(&mock_server)
            .await;

        let url = format!("{}/old.pdf", mock_server.uri());
        let dest = temp_dir.path().join("r.pdf");
        downloader_for(&url, DEFAULT_DOWNLOAD_TIMEOUT)
            .download(&url, &dest)
            .await
            .unwrap();

        assert_eq!(std::fs::read(&dest).unwrap(), b"moved");
    }

    #[tokio::test]
    async fn test_download_large_file_streams() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        let temp_dir = TempDir::new().unwrap();

        let large_content: Vec<u8> = (0..2 * 1024 * 1024_u32).map(|i| (i % 253) as u8).collect();

        Mock::given(method("GET"))
            .and(path("/large.pdf"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(large_content.clone()))
            .mount(&mock_server)
            .await;

        let url = format!("{}/large.pdf", mock_server.uri());
        let dest = temp_dir.path().join("large.pdf");
        downloader_for(&url, DEFAULT_DOWNLOAD_TIMEOUT)
            .download(&url, &dest)
            .await
            .unwrap();

        assert_eq!(std::fs::read(&dest).unwrap(), large_content);
    }

    #[tokio::test]
    async fn test_download_sends_browser_headers_and_referer() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        let temp_dir = TempDir::new().unwrap();

        Mock::given(method("GET"))
            .and(path("/h.pdf"))
            .and(header("Referer", "https://127.0.0.1"))
            .and(headers("Accept-Language", vec!["en-US", "en;q=0.9"]))
            .and(header_exists("accept-encoding"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ok"))
            .mount(&mock_server)
            .await;

        let url = format!("{}/h.pdf", mock_server.uri());
        let result = downloader_for(&url, DEFAULT_DOWNLOAD_TIMEOUT)
            .download(&url, &temp_dir.path().join("h.pdf"))
            .await;
        assert!(result.is_ok(), "headers should match: {result:?}");
    }

    #[tokio::test]
    async fn test_download_timeout_is_error_and_leaves_no_file() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        let temp_dir = TempDir::new().unwrap();

        Mock::given(method("GET"))
            .and(path("/slow.pdf"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(b"data")
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&mock_server)
            .await;

        let url = format!("{}/slow.pdf", mock_server.uri());
        let result = downloader_for(&url, Duration::from_secs(1))
            .download(&url, &temp_dir.path().join("slow.pdf"))
            .await;

        assert!(
            matches!(result, Err(DownloadError::Timeout { .. } | DownloadError::Network { .. })),
            "expected timeout, got: {result:?}"
        );
        let entries: Vec<_> = std::fs::read_dir(temp_dir.path()).unwrap().collect();
        assert!(entries.is_empty(), "no file after timeout: {entries:?}");
    }

    #[test]
    fn test_download_invalid_url() {
        let temp_dir = TempDir::new().unwrap();
        let downloader = downloader_for("https://example.com/", DEFAULT_DOWNLOAD_TIMEOUT);

        let result = tokio_test::block_on(
            downloader.download("not-a-valid-url", &temp_dir.path().join("x.pdf")),
        );
        assert!(matches!(result, Err(DownloadError::InvalidUrl { .. })));
        assert!(!temp_dir.path().join("x.pdf").exists());
    }
}
