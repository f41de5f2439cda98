//! In-memory cache implementation with LRU eviction.
//!
//! Provides a thread-safe in-memory cache with TTL support using
//! tokio synchronization primitives and LRU eviction policy.
//!
//! Expiry is measured with `tokio::time::Instant`, so tests can drive it
//! deterministically with a paused clock.

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use lru::LruCache;
use tokio::sync::RwLock;
use tokio::time::Instant;

use schoolhub_core::cache::{Cache, Result};
use schoolhub_core::entity::EntityKind;

/// Smallest capacity the cache accepts: one slot per collection, so that a
/// live collection is only ever dropped by its TTL.
pub const MIN_CACHE_ENTRIES: usize = EntityKind::ALL.len();

/// A single cache entry with optional expiration.
#[derive(Debug, Clone)]
struct CacheEntry {
    value: Vec<u8>,
    expires_at: Option<Instant>,
}

impl CacheEntry {
    /// Creates a new cache entry with optional TTL.
    fn new(value: Vec<u8>, ttl: Option<Duration>) -> Self {
        let expires_at = ttl.map(|d| Instant::now() + d);
        Self { value, expires_at }
    }

    /// Returns true once the TTL has fully elapsed. A zero TTL is expired
    /// as soon as it is written.
    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|exp| Instant::now() >= exp)
    }
}

/// In-memory cache implementation with LRU eviction.
///
/// Thread-safe cache using `Arc<RwLock<LruCache>>` for concurrent access.
/// Supports TTL with lazy expiration (expired entries are dropped when read).
/// Uses LRU eviction to limit memory usage when max_entries is reached.
#[derive(Debug, Clone)]
pub struct MemoryCache {
    store: Arc<RwLock<LruCache<String, CacheEntry>>>,
}

impl MemoryCache {
    /// Creates a new in-memory cache holding at most `max_entries` keys.
    ///
    /// Capacities below [`MIN_CACHE_ENTRIES`] are raised to it.
    pub fn new(max_entries: usize) -> Self {
        let capacity =
            NonZeroUsize::new(max_entries.max(MIN_CACHE_ENTRIES)).unwrap_or(NonZeroUsize::MIN);
        Self {
            store: Arc::new(RwLock::new(LruCache::new(capacity))),
        }
    }

    /// Returns the number of stored entries, including expired ones not yet
    /// read back.
    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut store = self.store.write().await;

        let expired = match store.get(key) {
            Some(entry) if !entry.is_expired() => return Ok(Some(entry.value.clone())),
            Some(_) => true,
            None => false,
        };
        if expired {
            store.pop(key);
        }
        Ok(None)
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()> {
        let mut store = self.store.write().await;
        store.put(key.to_string(), CacheEntry::new(value.to_vec(), ttl));
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut store = self.store.write().await;
        store.pop(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schoolhub_core::cache::collection_key;

    /// Default max entries for tests
    const TEST_MAX_ENTRIES: usize = 1000;

    #[tokio::test]
    async fn test_set_and_get() {
        let cache = MemoryCache::new(TEST_MAX_ENTRIES);
        let key = "users";
        let value = b"[]";

        cache.set(key, value, None).await.unwrap();
        let result = cache.get(key).await.unwrap();

        assert_eq!(result, Some(value.to_vec()));
    }

    #[tokio::test]
    async fn test_get_nonexistent() {
        let cache = MemoryCache::new(TEST_MAX_ENTRIES);
        let result = cache.get("clubs").await.unwrap();

        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn test_set_replaces_prior_entry() {
        let cache = MemoryCache::new(TEST_MAX_ENTRIES);

        cache.set("users", b"first", None).await.unwrap();
        cache.set("users", b"second", None).await.unwrap();

        assert_eq!(cache.get("users").await.unwrap(), Some(b"second".to_vec()));
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_delete() {
        let cache = MemoryCache::new(TEST_MAX_ENTRIES);
        let key = "grades";

        cache.set(key, b"to be deleted", None).await.unwrap();
        assert!(cache.get(key).await.unwrap().is_some());

        cache.delete(key).await.unwrap();
        assert!(cache.get(key).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_nonexistent_is_ok() {
        let cache = MemoryCache::new(TEST_MAX_ENTRIES);
        assert!(cache.delete("missing").await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_ttl_expiration() {
        let cache = MemoryCache::new(TEST_MAX_ENTRIES);
        let key = "users";

        cache
            .set(key, b"short-lived", Some(Duration::from_millis(180_000)))
            .await
            .unwrap();

        tokio::time::advance(Duration::from_millis(179_999)).await;
        assert!(cache.get(key).await.unwrap().is_some());

        tokio::time::advance(Duration::from_millis(1)).await;
        assert!(cache.get(key).await.unwrap().is_none());

        // Expired entries are dropped on read
        assert!(cache.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_refreshes_ttl() {
        let cache = MemoryCache::new(TEST_MAX_ENTRIES);
        let ttl = Some(Duration::from_secs(10));

        cache.set("clubs", b"v1", ttl).await.unwrap();
        tokio::time::advance(Duration::from_secs(8)).await;
        cache.set("clubs", b"v2", ttl).await.unwrap();
        tokio::time::advance(Duration::from_secs(8)).await;

        assert_eq!(cache.get("clubs").await.unwrap(), Some(b"v2".to_vec()));
    }

    #[tokio::test]
    async fn test_zero_ttl_expires_immediately() {
        let cache = MemoryCache::new(TEST_MAX_ENTRIES);

        cache.set("events", b"gone", Some(Duration::ZERO)).await.unwrap();

        assert!(cache.get("events").await.unwrap().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_ttl_never_expires() {
        let cache = MemoryCache::new(TEST_MAX_ENTRIES);

        cache.set("schools", b"forever", None).await.unwrap();
        tokio::time::advance(Duration::from_secs(365 * 24 * 3600)).await;

        assert!(cache.get("schools").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_lru_eviction() {
        let cache = MemoryCache::new(MIN_CACHE_ENTRIES);
        for i in 0..MIN_CACHE_ENTRIES {
            cache.set(&format!("key-{i}"), b"v", None).await.unwrap();
        }

        // Touch "key-0" so "key-1" becomes least recently used
        cache.get("key-0").await.unwrap();
        cache.set("extra", b"v", None).await.unwrap();

        assert!(cache.get("key-0").await.unwrap().is_some());
        assert!(cache.get("key-1").await.unwrap().is_none());
        assert!(cache.get("extra").await.unwrap().is_some());
        assert_eq!(cache.len().await, MIN_CACHE_ENTRIES);
    }

    #[tokio::test(start_paused = true)]
    async fn test_small_capacity_keeps_every_collection() {
        let cache = MemoryCache::new(1);
        let ttl = Some(Duration::from_millis(180_000));

        for kind in EntityKind::ALL {
            cache.set(collection_key(kind), b"[]", ttl).await.unwrap();
        }
        tokio::time::advance(Duration::from_millis(179_000)).await;

        for kind in EntityKind::ALL {
            assert!(cache.get(collection_key(kind)).await.unwrap().is_some());
        }
    }

    #[tokio::test]
    async fn test_zero_capacity_is_raised() {
        let cache = MemoryCache::new(0);

        cache.set("users", b"1", None).await.unwrap();
        cache.set("clubs", b"2", None).await.unwrap();

        assert_eq!(cache.get("users").await.unwrap(), Some(b"1".to_vec()));
        assert_eq!(cache.get("clubs").await.unwrap(), Some(b"2".to_vec()));
    }
}
