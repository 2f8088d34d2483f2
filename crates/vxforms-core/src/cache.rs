//! Process-wide lookup result cache using moka
//!
//! One entry per [`Lookup`]. Entries are populated on first successful
//! resolution and reused for the lifetime of the cache:
//! - Concurrent first-population is coalesced into a single load
//! - Failed loads are never inserted, so the next call retries
//! - Optional time-based expiration (TTL)

use moka::future::Cache;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use vxforms_template::{Lookup, LookupError};

/// Default number of cached lookup results
pub const DEFAULT_CAPACITY: u64 = 64;

/// Smallest capacity holding one entry per lookup
pub const MIN_CAPACITY: u64 = Lookup::ALL.len() as u64;

/// Cache of named lookup results
///
/// Capacity is never below [`MIN_CAPACITY`], so a populated entry is not
/// evicted to make room for another lookup.
#[derive(Debug, Clone)]
pub struct LookupCache {
    inner: Cache<Lookup, Arc<[String]>>,
}

impl LookupCache {
    /// Create new cache with max capacity, raised to [`MIN_CAPACITY`]
    #[inline]
    #[must_use]
    pub fn new(max_capacity: u64) -> Self {
        Self {
            inner: Cache::new(max_capacity.max(MIN_CAPACITY)),
        }
    }

    /// Create cache with time-based expiration
    #[inline]
    #[must_use]
    pub fn with_ttl(max_capacity: u64, ttl: Duration) -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(max_capacity.max(MIN_CAPACITY))
                .time_to_live(ttl)
                .build(),
        }
    }

    /// Get cached result
    #[inline]
    pub async fn get(&self, lookup: Lookup) -> Option<Arc<[String]>> {
        self.inner.get(&lookup).await
    }

    /// Get cached result or run `load` to populate it
    ///
    /// Callers racing on an absent entry wait for one winner's load.
    ///
    /// # Errors
    /// Returns the load error; it is not cached
    pub async fn try_get_with<F>(&self, lookup: Lookup, load: F) -> Result<Arc<[String]>, LookupError>
    where
        F: Future<Output = Result<Arc<[String]>, LookupError>>,
    {
        self.inner
            .try_get_with(lookup, load)
            .await
            .map_err(|err| LookupError::clone(&err))
    }

    /// Check if a result is cached
    #[inline]
    pub async fn contains(&self, lookup: Lookup) -> bool {
        self.inner.get(&lookup).await.is_some()
    }

    /// Configured capacity
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> u64 {
        self.inner.policy().max_capacity().unwrap_or(MIN_CAPACITY)
    }
}

impl Default for LookupCache {
    /// Create cache with default capacity
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn values(items: &[&str]) -> Arc<[String]> {
        items.iter().map(ToString::to_string).collect()
    }

    async fn load(cache: &LookupCache, lookup: Lookup, items: &[&str]) -> Arc<[String]> {
        cache
            .try_get_with(lookup, async { Ok(values(items)) })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_load_and_get() {
        let cache = LookupCache::new(16);
        load(&cache, Lookup::Regions, &["CONUS"]).await;

        let cached = cache.get(Lookup::Regions).await.unwrap();
        assert_eq!(&*cached, &["CONUS".to_string()]);
        assert!(cache.get(Lookup::Subsets).await.is_none());
    }

    #[test]
    fn test_capacity_never_below_lookup_count() {
        assert_eq!(MIN_CAPACITY, 16);
        assert_eq!(LookupCache::new(2).capacity(), MIN_CAPACITY);
        assert_eq!(LookupCache::with_ttl(0, Duration::from_secs(5)).capacity(), MIN_CAPACITY);
        assert_eq!(LookupCache::new(100).capacity(), 100);
        assert_eq!(LookupCache::default().capacity(), DEFAULT_CAPACITY);
    }

    #[tokio::test]
    async fn test_small_capacity_keeps_every_lookup() {
        let cache = LookupCache::new(1);
        for lookup in Lookup::ALL {
            load(&cache, lookup, &["x"]).await;
        }
        for lookup in Lookup::ALL {
            assert!(cache.contains(lookup).await, "{lookup} was evicted");
        }
    }

    #[tokio::test]
    async fn test_try_get_with_loads_once() {
        let cache = LookupCache::default();
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let result = cache
                .try_get_with(Lookup::Statuses, async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(values(&["active"]))
                })
                .await
                .unwrap();
            assert_eq!(result.len(), 1);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let cache = LookupCache::default();

        let err = cache
            .try_get_with(Lookup::Subsets, async {
                Err(LookupError::new(Lookup::Subsets, "timeout"))
            })
            .await
            .unwrap_err();
        assert_eq!(err.reason, "timeout");
        assert!(!cache.contains(Lookup::Subsets).await);

        let ok = cache
            .try_get_with(Lookup::Subsets, async { Ok(values(&["METAR"])) })
            .await
            .unwrap();
        assert_eq!(&*ok, &["METAR".to_string()]);
        assert!(cache.contains(Lookup::Subsets).await);
    }

    #[tokio::test]
    async fn test_ttl_cache_serves_fresh_entries() {
        let cache = LookupCache::with_ttl(16, Duration::from_secs(60));
        load(&cache, Lookup::Regions, &["CONUS"]).await;
        assert!(cache.contains(Lookup::Regions).await);
    }
}
