//! pdf-watch core library
//!
//! Watches one web page for schedule PDFs: scrapes its PDF links, keeps
//! those matching a schedule pattern, downloads them, and records each
//! previously unseen file by the SHA-256 digest of its content.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`hash`] - Content digests
//! - [`db`] - Database connection and schema management
//! - [`store`] - Seen-PDF dedup store and its repository trait
//! - [`scrape`] - PDF link discovery on a page
//! - [`filter`] - Schedule pattern filtering
//! - [`download`] - Streaming downloads
//! - [`http`] - Shared request headers and client construction
//! - [`config`] - Run configuration
//! - [`pipeline`] - One-shot orchestration of all of the above

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod db;
pub mod download;
pub mod filter;
pub mod hash;
pub mod http;
pub mod pipeline;
pub mod scrape;
pub mod store;
#[cfg(test)]
pub(crate) mod test_support;
mod user_agent;

// Re-export commonly used types
pub use config::{ConfigError, PipelineConfig};
pub use db::{Database, DbError};
pub use download::{DownloadError, Downloader, unique_pdf_path};
pub use filter::{FilterError, PatternFilter, filter_matching};
pub use hash::{content_digest, file_digest};
pub use http::RequestOptions;
pub use pipeline::{ItemOutcome, ItemReport, Pipeline, PipelineError, RunReport};
pub use scrape::{LinkExtractor, ScrapeError, extract_pdf_links};
pub use store::{SeenPdfRecord, SeenPdfRepository, SeenPdfStore, StoreError};
pub use user_agent::BROWSER_USER_AGENT;
