//! In-memory response cache with lazy expiry
//!
//! Entries are stamped when stored and read as absent once older than the
//! configured TTL. Expired entries are not purged; the next `put` for the same
//! key overwrites them. The keyspace is small and process-lived, so there is no
//! size bound and no eviction.

use std::collections::HashMap;
use std::time::Instant;

use tokio::sync::RwLock;
use tracing::debug;

use super::config::CacheConfig;
use super::stats::{CacheCounters, CacheStats};

/// A stored value and the moment it was stored
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    pub value: V,
    pub stored_at: Instant,
}

impl<V> CacheEntry<V> {
    fn new(value: V) -> Self {
        Self {
            value,
            stored_at: Instant::now(),
        }
    }

    /// An entry is valid iff `now - stored_at < ttl`
    pub fn is_valid(&self, config: &CacheConfig) -> bool {
        self.stored_at.elapsed() < config.ttl
    }
}

/// Key/value store with a single fixed TTL
///
/// Values are handed out as clones; callers get read-only snapshots and never
/// alias the stored value. Use cheap-to-clone values (`Arc`) for large payloads.
#[derive(Debug)]
pub struct ResponseCache<V> {
    config: CacheConfig,
    entries: RwLock<HashMap<String, CacheEntry<V>>>,
    counters: CacheCounters,
}

impl<V: Clone> ResponseCache<V> {
    /// Create an empty cache
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            entries: RwLock::new(HashMap::new()),
            counters: CacheCounters::default(),
        }
    }

    /// Get the cache configuration
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Look up a live entry
    pub async fn get(&self, key: &str) -> Option<V> {
        let entries = self.entries.read().await;
        match entries.get(key) {
            Some(entry) if entry.is_valid(&self.config) => {
                self.counters.record_hit();
                Some(entry.value.clone())
            }
            Some(_) => {
                debug!("Cache entry expired: {}", key);
                self.counters.record_expired();
                None
            }
            None => {
                self.counters.record_miss();
                None
            }
        }
    }

    /// Store a value, replacing any previous entry for the key
    pub async fn put(&self, key: impl Into<String>, value: V) {
        let key = key.into();
        let mut entries = self.entries.write().await;
        entries.insert(key, CacheEntry::new(value));
        self.counters.record_store();
    }

    /// Number of stored entries, expired ones included
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the cache holds no entries at all
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Drop every entry and reset counters
    pub async fn clear(&self) {
        self.entries.write().await.clear();
        self.counters.reset();
    }

    /// Snapshot of cache activity
    pub async fn stats(&self) -> CacheStats {
        let entries = self.len().await;
        self.counters.snapshot(entries)
    }
}

impl<V: Clone> Default for ResponseCache<V> {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_put_then_get_round_trip() {
        let cache: ResponseCache<Vec<u64>> = ResponseCache::default();
        cache.put("photos-curiosity-1000-1", vec![1, 2, 3]).await;

        assert_eq!(
            cache.get("photos-curiosity-1000-1").await,
            Some(vec![1, 2, 3])
        );
        assert_eq!(cache.get("photos-curiosity-1001-1").await, None);
    }

    #[tokio::test]
    async fn test_entry_expires_after_ttl() {
        let cache = ResponseCache::new(CacheConfig::with_ttl(Duration::from_millis(20)));
        cache.put("rover-spirit", "spirit".to_string()).await;
        assert!(cache.get("rover-spirit").await.is_some());

        tokio::time::sleep(Duration::from_millis(40)).await;
        assert_eq!(cache.get("rover-spirit").await, None);

        // Lazy expiry: the entry is still stored until overwritten
        assert_eq!(cache.len().await, 1);
        let stats = cache.stats().await;
        assert_eq!(stats.expired, 1);
    }

    #[tokio::test]
    async fn test_put_overwrites_expired_entry() {
        let cache = ResponseCache::new(CacheConfig::with_ttl(Duration::from_millis(20)));
        cache.put("latest-curiosity", 1u32).await;
        tokio::time::sleep(Duration::from_millis(40)).await;

        cache.put("latest-curiosity", 2u32).await;
        assert_eq!(cache.get("latest-curiosity").await, Some(2));
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_stats_and_clear() {
        let cache: ResponseCache<u32> = ResponseCache::default();
        cache.put("a", 1).await;
        cache.get("a").await;
        cache.get("b").await;

        let stats = cache.stats().await;
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.stores, 1);

        cache.clear().await;
        assert!(cache.is_empty().await);
        assert_eq!(cache.stats().await, CacheStats::default());
    }

    #[tokio::test]
    async fn test_concurrent_puts_do_not_corrupt() {
        let cache = Arc::new(ResponseCache::<u32>::default());
        let handles: Vec<_> = (0..16)
            .map(|i| {
                let cache = Arc::clone(&cache);
                tokio::spawn(async move {
                    cache.put("all-sources", i).await;
                    cache.put(format!("key-{}", i), i).await;
                })
            })
            .collect();

        for result in futures::future::join_all(handles).await {
            result.unwrap();
        }

        assert_eq!(cache.len().await, 17);
        assert!(cache.get("all-sources").await.is_some());
    }
}
