//! Repository seam for seen-PDF persistence.
//!
//! The pipeline depends on this trait rather than on [`SeenPdfStore`] so that
//! store behavior can be substituted in tests.

use async_trait::async_trait;

use super::{Result, SeenPdfStore};

/// Data-access contract used by the pipeline's record stage.
#[async_trait]
pub trait SeenPdfRepository: Send + Sync {
    /// Returns whether a record with this digest exists.
    async fn exists(&self, hash: &str) -> Result<bool>;

    /// Inserts a record if absent. Returns `true` when a row was created.
    async fn insert(&self, hash: &str, source_url: &str) -> Result<bool>;
}

#[async_trait]
impl SeenPdfRepository for SeenPdfStore {
    async fn exists(&self, hash: &str) -> Result<bool> {
        SeenPdfStore::exists(self, hash).await
    }

    async fn insert(&self, hash: &str, source_url: &str) -> Result<bool> {
        SeenPdfStore::insert(self, hash, source_url).await
    }
}
