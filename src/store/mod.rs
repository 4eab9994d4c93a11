//! Content-addressed store of PDFs already seen.
//!
//! Backed by the `seen_pdfs` `SQLite` table. The `hash` primary key makes
//! [`SeenPdfStore::insert`] idempotent: a second insert of the same digest is
//! a silent no-op and never touches `source_url` or `first_seen_utc`.
//!
//! # Example
//!
//! ```ignore
//! use pdf_watch_core::store::SeenPdfStore;
//! use std::path::Path;
//!
//! let store = SeenPdfStore::initialize(Path::new("ssa.db")).await?;
//! if !store.exists(&digest).await? {
//!     store.insert(&digest, "https://example.com/72hr.pdf").await?;
//! }
//! ```

mod error;
mod record;
mod repository;

pub use error::{StoreDbErrorKind, StoreError};
pub use record::SeenPdfRecord;
pub use repository::SeenPdfRepository;

use std::path::Path;

use chrono::Utc;
use tracing::{debug, instrument};

use crate::db::Database;

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Seen-PDF store over an open [`Database`].
#[derive(Debug, Clone)]
pub struct SeenPdfStore {
    db: Database,
}

impl SeenPdfStore {
    /// Wraps an already-open database.
    #[must_use]
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Opens the store file at `path`, creating it and `seen_pdfs` if absent.
    ///
    /// Safe to call on every run; existing rows are never touched.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Initialize`] if the file cannot be opened or migrated.
    #[instrument(skip(path), fields(path = %path.display()))]
    pub async fn initialize(path: &Path) -> Result<Self> {
        let db = Database::new(path)
            .await
            .map_err(|e| StoreError::initialize(path.display().to_string(), e))?;
        debug!("seen_pdfs store ready");
        Ok(Self::new(db))
    }

    /// Opens a throwaway in-memory store.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Initialize`] if the in-memory database fails to migrate.
    pub async fn in_memory() -> Result<Self> {
        let db = Database::new_in_memory()
            .await
            .map_err(|e| StoreError::initialize(":memory:", e))?;
        Ok(Self::new(db))
    }

    /// Returns whether a record with this digest exists.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the query fails.
    #[instrument(skip(self))]
    pub async fn exists(&self, hash: &str) -> Result<bool> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT 1 FROM seen_pdfs WHERE hash = ?")
            .bind(hash)
            .fetch_optional(self.db.pool())
            .await?;
        Ok(row.is_some())
    }

    /// Inserts `hash` with the current UTC time if it is not already present.
    ///
    /// Returns `true` if a new row was created, `false` if the digest was
    /// already recorded (the existing row is left unchanged).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the insert fails.
    #[instrument(skip(self))]
    pub async fn insert(&self, hash: &str, source_url: &str) -> Result<bool> {
        let result = sqlx::query(
            r"INSERT OR IGNORE INTO seen_pdfs (hash, source_url, first_seen_utc)
              VALUES (?, ?, ?)",
        )
        .bind(hash)
        .bind(source_url)
        .bind(Utc::now())
        .execute(self.db.pool())
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Fetches the record for `hash`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the query fails.
    #[instrument(skip(self))]
    pub async fn get(&self, hash: &str) -> Result<Option<SeenPdfRecord>> {
        let record = sqlx::query_as::<_, SeenPdfRecord>(
            "SELECT hash, source_url, first_seen_utc FROM seen_pdfs WHERE hash = ?",
        )
        .bind(hash)
        .fetch_optional(self.db.pool())
        .await?;
        Ok(record)
    }

    /// Lists all records, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the query fails.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<SeenPdfRecord>> {
        let records = sqlx::query_as::<_, SeenPdfRecord>(
            "SELECT hash, source_url, first_seen_utc FROM seen_pdfs ORDER BY first_seen_utc ASC, hash ASC",
        )
        .fetch_all(self.db.pool())
        .await?;
        Ok(records)
    }

    /// Returns the number of recorded digests.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the query fails.
    pub async fn count(&self) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM seen_pdfs")
            .fetch_one(self.db.pool())
            .await?;
        Ok(count)
    }

    /// Closes the underlying pool.
    pub async fn close(self) {
        self.db.close().await;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const HASH_A: &str = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";
    const HASH_B: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

    #[tokio::test]
    async fn test_exists_false_before_insert_true_after() {
        let store = SeenPdfStore::in_memory().await.unwrap();

        assert!(!store.exists(HASH_A).await.unwrap());
        assert!(store.insert(HASH_A, "https://example.com/72hr.pdf").await.unwrap());
        assert!(store.exists(HASH_A).await.unwrap());
        assert!(!store.exists(HASH_B).await.unwrap());
    }

    #[tokio::test]
    async fn test_second_insert_is_noop_and_keeps_first_values() {
        let store = SeenPdfStore::in_memory().await.unwrap();

        assert!(store.insert(HASH_A, "https://example.com/first.pdf").await.unwrap());
        let first = store.get(HASH_A).await.unwrap().unwrap();

        let inserted_again = store
            .insert(HASH_A, "https://example.com/second.pdf")
            .await
            .unwrap();
        assert!(!inserted_again, "duplicate insert must report no new row");

        let after = store.get(HASH_A).await.unwrap().unwrap();
        assert_eq!(after, first, "record must not be updated");
        assert_eq!(after.source_url, "https://example.com/first.pdf");
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let store = SeenPdfStore::in_memory().await.unwrap();
        assert!(store.get(HASH_B).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_first_seen_is_recent_utc() {
        let store = SeenPdfStore::in_memory().await.unwrap();
        let before = Utc::now();
        store.insert(HASH_A, "https://example.com/a.pdf").await.unwrap();
        let after = Utc::now();

        let record = store.get(HASH_A).await.unwrap().unwrap();
        assert!(record.first_seen_utc >= before - chrono::Duration::seconds(1));
        assert!(record.first_seen_utc <= after + chrono::Duration::seconds(1));
    }

    #[tokio::test]
    async fn test_list_returns_all_records() {
        let store = SeenPdfStore::in_memory().await.unwrap();
        store.insert(HASH_A, "https://example.com/a.pdf").await.unwrap();
        store.insert(HASH_B, "https://example.com/b.pdf").await.unwrap();

        let records = store.list().await.unwrap();
        assert_eq!(records.len(), 2);
        let hashes: Vec<&str> = records.iter().map(|r| r.hash.as_str()).collect();
        assert!(hashes.contains(&HASH_A));
        assert!(hashes.contains(&HASH_B));
    }

    #[tokio::test]
    async fn test_initialize_persists_across_reopen() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("ssa.db");

        let store = SeenPdfStore::initialize(&path).await.unwrap();
        store.insert(HASH_A, "https://example.com/a.pdf").await.unwrap();
        store.close().await;

        let reopened = SeenPdfStore::initialize(&path).await.unwrap();
        assert!(reopened.exists(HASH_A).await.unwrap());
        assert!(!reopened.insert(HASH_A, "https://example.com/other.pdf").await.unwrap());
    }

    #[tokio::test]
    async fn test_initialize_corrupted_file_is_fatal() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("corrupted.db");
        std::fs::write(&path, b"garbage, not sqlite").unwrap();

        let result = SeenPdfStore::initialize(&path).await;
        assert!(matches!(result, Err(StoreError::Initialize { .. })));
    }

    #[tokio::test]
    async fn test_repeated_inserts_through_repository_trait() {
        let store = SeenPdfStore::in_memory().await.unwrap();
        let repo: &dyn SeenPdfRepository = &store;

        for _ in 0..5 {
            repo.insert(HASH_A, "https://example.com/a.pdf").await.unwrap();
        }
        assert!(repo.exists(HASH_A).await.unwrap());
        assert_eq!(store.count().await.unwrap(), 1);
    }
}
