//! Streaming PDF downloads.
//!
//! # Features
//!
//! - Streaming to disk (bounded memory regardless of file size)
//! - Redirect following and a fixed per-request timeout (30s by default)
//! - Parent directory creation for the destination path
//! - Structured, pre-logged errors so callers can skip failed items
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use std::time::Duration;
//!
//! use pdf_watch_core::download::{Downloader, unique_pdf_path};
//! use pdf_watch_core::http::RequestOptions;
//! use url::Url;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let target = Url::parse("https://example.com/terminal/")?;
//! let downloader = Downloader::new(&RequestOptions::browser_like(&target, Duration::from_secs(30)))?;
//! let dest = unique_pdf_path(Path::new("pdf_downloads"));
//! let saved = downloader.download("https://example.com/72hr.pdf", &dest).await?;
//! println!("Downloaded: {}", saved.display());
//! # Ok(())
//! # }
//! ```

mod client;
mod constants;
mod error;

pub use client::{DEFAULT_DOWNLOAD_TIMEOUT, Downloader, unique_pdf_path};
pub use constants::{DOWNLOAD_TIMEOUT_SECS, PDF_EXTENSION};
pub use error::DownloadError;
