//! Content hashing for PDF deduplication.
//!
//! Digests are lowercase hex SHA-256 strings (64 chars) and serve as the
//! primary key of the `seen_pdfs` table.

use std::path::Path;

use sha2::{Digest, Sha256};
use tokio::io::AsyncReadExt;
use tracing::instrument;

/// Length of a hex-encoded SHA-256 digest.
pub const DIGEST_HEX_LEN: usize = 64;

/// Read buffer size used when hashing files from disk.
const READ_CHUNK_SIZE: usize = 8192;

/// Computes the hex-encoded SHA-256 digest of `content`.
///
/// # Examples
///
/// ```
/// use pdf_watch_core::hash::content_digest;
///
/// let digest = content_digest(b"%PDF-1.7");
/// assert_eq!(digest.len(), 64);
/// assert_eq!(digest, content_digest(b"%PDF-1.7"));
/// ```
#[must_use]
pub fn content_digest(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("{:x}", hasher.finalize())
}

/// Computes the digest of a file on disk, reading it in bounded chunks.
///
/// Produces the same value as [`content_digest`] over the file's bytes.
///
/// # Errors
///
/// Returns the underlying IO error if the file cannot be opened or read.
#[instrument(skip(path), fields(path = %path.display()))]
pub async fn file_digest(path: &Path) -> std::io::Result<String> {
    let mut file = tokio::fs::File::open(path).await?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0_u8; READ_CHUNK_SIZE];

    loop {
        let read = file.read(&mut buffer).await?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}
