//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::remote::{Entry, ListingProvider};

/// In-memory provider that records every path it is asked to list.
#[derive(Default)]
pub struct FakeProvider {
    dirs: HashMap<String, Result<Vec<Entry>, ProviderError>>,
    stalled: HashSet<String>,
    calls: Mutex<Vec<String>>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dir(mut self, path: &str, entries: Vec<Entry>) -> Self {
        self.dirs.insert(path.to_string(), Ok(entries));
        self
    }

    pub fn failing(mut self, path: &str, err: ProviderError) -> Self {
        self.dirs.insert(path.to_string(), Err(err));
        self
    }

    /// Listing `path` never completes.
    pub fn stalled(mut self, path: &str) -> Self {
        self.stalled.insert(path.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_for(&self, path: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|p| *p == path).count()
    }
}

#[async_trait]
impl ListingProvider for FakeProvider {
    async fn list(&self, path: &str) -> Result<Vec<Entry>, ProviderError> {
        self.calls.lock().unwrap().push(path.to_string());
        if self.stalled.contains(path) {
            std::future::pending::<()>().await;
        }
        self.dirs
            .get(path)
            .cloned()
            .unwrap_or(Err(ProviderError::NotFound))
    }
}

/// `count` files named `f00`, `f01`, ...
pub fn numbered_files(count: usize) -> Vec<Entry> {
    (0..count)
        .map(|i| Entry::file(format!("f{i:02}"), i as u64))
        .collect()
}
