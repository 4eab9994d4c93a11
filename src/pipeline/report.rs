//! Per-run outcome reporting.

use std::path::PathBuf;

/// What happened to one filtered link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    /// Downloaded, hashed, and recorded for the first time.
    New {
        /// Content digest.
        hash: String,
        /// Local artifact path.
        path: PathBuf,
    },
    /// Downloaded and hashed; the digest was already known.
    Duplicate {
        /// Content digest.
        hash: String,
        /// Local artifact path (kept on disk).
        path: PathBuf,
    },
    /// The download did not produce a file.
    DownloadFailed {
        /// Display form of the download error.
        reason: String,
    },
    /// The artifact was written but could not be read back for hashing.
    ReadFailed {
        /// Local artifact path.
        path: PathBuf,
        /// Display form of the read error.
        reason: String,
    },
}

impl ItemOutcome {
    /// Digest of the artifact, when it was identified.
    #[must_use]
    pub fn hash(&self) -> Option<&str> {
        match self {
            Self::New { hash, .. } | Self::Duplicate { hash, .. } => Some(hash),
            Self::DownloadFailed { .. } | Self::ReadFailed { .. } => None,
        }
    }

    /// True for download and read-back failures.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::DownloadFailed { .. } | Self::ReadFailed { .. })
    }
}

/// A filtered link paired with its outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemReport {
    /// Absolute source URL.
    pub url: String,
    /// What happened to it.
    pub outcome: ItemOutcome,
}

/// Summary of one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// The discovery request failed; no links were considered.
    pub discovery_failed: bool,
    /// PDF links found on the target page.
    pub discovered: usize,
    /// Links that passed the pattern filter.
    pub matched: usize,
    /// One entry per matched link, in discovery order.
    pub items: Vec<ItemReport>,
}

impl RunReport {
    /// Links whose download produced a file.
    #[must_use]
    pub fn downloaded(&self) -> usize {
        self.items
            .iter()
            .filter(|item| !matches!(item.outcome, ItemOutcome::DownloadFailed { .. }))
            .count()
    }

    /// Newly recorded artifacts.
    #[must_use]
    pub fn new_records(&self) -> usize {
        self.count(|outcome| matches!(outcome, ItemOutcome::New { .. }))
    }

    /// Artifacts whose digest was already known.
    #[must_use]
    pub fn duplicates(&self) -> usize {
        self.count(|outcome| matches!(outcome, ItemOutcome::Duplicate { .. }))
    }

    /// Download and read-back failures.
    #[must_use]
    pub fn failures(&self) -> usize {
        self.count(ItemOutcome::is_failure)
    }

    fn count(&self, predicate: impl Fn(&ItemOutcome) -> bool) -> usize {
        self.items.iter().filter(|item| predicate(&item.outcome)).count()
    }
}
