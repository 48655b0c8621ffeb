//! Remote listing data model and the provider boundary.
//!
//! Paths handed to a provider are relative to the remote root and use `/`
//! separators; the empty string is the root itself.

pub mod rclone;
pub mod target;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::ProviderError;

/// Separator used in remote paths.
pub const SEPARATOR: char = '/';

/// One file or directory record within a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub is_dir: bool,
    /// Zero for directories and when the backend does not report a size.
    pub size_bytes: u64,
    pub modified_at: Option<DateTime<Utc>>,
}

#[allow(dead_code)]
impl Entry {
    pub fn file(name: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            name: name.into(),
            is_dir: false,
            size_bytes,
            modified_at: None,
        }
    }

    pub fn dir(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_dir: true,
            size_bytes: 0,
            modified_at: None,
        }
    }
}

/// The contents of one remote directory as returned by a single fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryListing {
    pub path: String,
    pub entries: Vec<Entry>,
    pub fetched_at: DateTime<Utc>,
}

impl DirectoryListing {
    pub fn new(path: impl Into<String>, entries: Vec<Entry>) -> Self {
        Self {
            path: path.into(),
            entries,
            fetched_at: Utc::now(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Join a child name onto a remote path.
pub fn child_path(parent: &str, name: &str) -> String {
    if parent.is_empty() || parent.ends_with(SEPARATOR) {
        format!("{parent}{name}")
    } else {
        format!("{parent}{SEPARATOR}{name}")
    }
}

/// Source of directory listings.
///
/// Implementations own ordering: entries are displayed in the order returned.
#[async_trait]
pub trait ListingProvider: Send + Sync {
    /// List the immediate children of `path`.
    async fn list(&self, path: &str) -> Result<Vec<Entry>, ProviderError>;
}
