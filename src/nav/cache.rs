use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, warn};

use crate::error::NavError;
use crate::remote::{DirectoryListing, ListingProvider};

/// Session-lifetime memo of the latest listing per path.
///
/// Entries never expire; only `invalidate` forces a refetch. Failed fetches
/// store nothing.
pub struct ListingCache<P> {
    provider: P,
    listings: HashMap<String, Arc<DirectoryListing>>,
}

impl<P: ListingProvider> ListingCache<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            listings: HashMap::new(),
        }
    }

    /// Return the cached listing for `path`, fetching it on a miss.
    pub async fn get(&mut self, path: &str) -> Result<Arc<DirectoryListing>, NavError> {
        if let Some(listing) = self.listings.get(path) {
            debug!("cache hit: '{path}'");
            return Ok(Arc::clone(listing));
        }

        debug!("cache miss: '{path}'");
        let entries = self.provider.list(path).await.map_err(|cause| {
            warn!("listing '{path}' failed: {cause}");
            NavError::FetchFailed {
                path: path.to_string(),
                cause,
            }
        })?;

        let listing = Arc::new(DirectoryListing::new(path, entries));
        debug!(
            "fetched '{path}': {} entries at {}",
            listing.len(),
            listing.fetched_at
        );
        self.listings.insert(path.to_string(), Arc::clone(&listing));
        Ok(listing)
    }

    /// Cached listing without fetching.
    #[allow(dead_code)]
    pub fn peek(&self, path: &str) -> Option<Arc<DirectoryListing>> {
        self.listings.get(path).cloned()
    }

    #[allow(dead_code)]
    pub fn invalidate(&mut self, path: &str) {
        if self.listings.remove(path).is_some() {
            debug!("invalidated '{path}'");
        }
    }

    pub fn contains(&self, path: &str) -> bool {
        self.listings.contains_key(path)
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.listings.len()
    }

    #[allow(dead_code)]
    pub fn provider(&self) -> &P {
        &self.provider
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderError;
    use crate::remote::Entry;
    use crate::test_support::FakeProvider;

    fn provider() -> FakeProvider {
        FakeProvider::new()
            .with_dir("", vec![Entry::dir("a"), Entry::file("b", 3)])
            .with_dir("a", vec![])
    }

    #[tokio::test]
    async fn second_get_is_served_from_cache() {
        let mut cache = ListingCache::new(provider());
        let first = cache.get("").await.unwrap();
        let second = cache.get("").await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.provider().calls_for(""), 1);
    }

    #[tokio::test]
    async fn invalidate_forces_refetch() {
        let mut cache = ListingCache::new(provider());
        let first = cache.get("a").await.unwrap();
        cache.invalidate("a");
        assert!(!cache.contains("a"));
        let second = cache.get("a").await.unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(cache.provider().calls_for("a"), 2);
    }

    #[tokio::test]
    async fn invalidate_unknown_path_is_noop() {
        let mut cache = ListingCache::new(provider());
        cache.invalidate("nowhere");
        assert_eq!(cache.len(), 0);
    }

    #[tokio::test]
    async fn failed_fetch_stores_nothing_and_retries() {
        let mut cache = ListingCache::new(provider().failing("a", ProviderError::PermissionDenied));
        let err = cache.get("a").await.unwrap_err();
        assert_eq!(
            err,
            NavError::FetchFailed {
                path: "a".into(),
                cause: ProviderError::PermissionDenied
            }
        );
        assert!(!cache.contains("a"));

        let err = cache.get("a").await.unwrap_err();
        assert!(matches!(err, NavError::FetchFailed { .. }));
        assert_eq!(cache.provider().calls_for("a"), 2);
    }

    #[tokio::test]
    async fn unknown_path_is_not_found() {
        let mut cache = ListingCache::new(provider());
        let err = cache.get("missing").await.unwrap_err();
        assert!(matches!(
            err,
            NavError::FetchFailed {
                cause: ProviderError::NotFound,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn peek_does_not_fetch() {
        let mut cache = ListingCache::new(provider());
        assert!(cache.peek("").is_none());
        assert_eq!(cache.provider().calls_for(""), 0);
        cache.get("").await.unwrap();
        assert_eq!(cache.peek("").unwrap().len(), 2);
        assert_eq!(cache.provider().calls_for(""), 1);
    }
}
