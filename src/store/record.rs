//! Persisted record of a PDF seen on the watched page.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// A row of the `seen_pdfs` table.
///
/// Created once, the first time a digest is recorded; never updated.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct SeenPdfRecord {
    /// Hex SHA-256 digest of the PDF bytes (primary key).
    pub hash: String,
    /// URL the PDF was first downloaded from.
    pub source_url: String,
    /// Insertion time, UTC.
    pub first_seen_utc: DateTime<Utc>,
}
