//! Constants for the download module.

/// Total timeout for one PDF download, in seconds.
pub const DOWNLOAD_TIMEOUT_SECS: u64 = 30;

/// Extension given to every downloaded artifact.
pub const PDF_EXTENSION: &str = "pdf";
