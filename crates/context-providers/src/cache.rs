//! Bounded memoization for per-hotel model output.
//!
//! Entries are evicted least-recently-used once `capacity` is reached, and an entry
//! older than `ttl` is treated as absent. Two callers racing on the same key may
//! both compute; the later insert wins.

use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

use context_core::Config;
use lru::LruCache;
use tokio::sync::Mutex;

pub const DEFAULT_CACHE_CAPACITY: usize = 128;
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60 * 60);

struct CachedEntry<V> {
    value: V,
    inserted_at: Instant,
}

pub struct MemoCache<V> {
    entries: Mutex<LruCache<String, CachedEntry<V>>>,
    ttl: Option<Duration>,
}

impl<V: Clone> Default for MemoCache<V> {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY, Some(DEFAULT_CACHE_TTL))
    }
}

impl<V: Clone> MemoCache<V> {
    /// `capacity` of zero is raised to one. `ttl: None` keeps entries until evicted.
    pub fn new(capacity: usize, ttl: Option<Duration>) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            ttl,
        }
    }

    /// Uses `insight_cache_capacity` and `insight_cache_ttl_secs` (0 disables expiry).
    pub fn from_config(config: &Config) -> Self {
        let ttl = match config.insight_cache_ttl_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };
        Self::new(config.insight_cache_capacity, ttl)
    }

    pub async fn get(&self, key: &str) -> Option<V> {
        let mut entries = self.entries.lock().await;

        let expired = match entries.peek(key) {
            Some(entry) => self.is_expired(entry),
            None => return None,
        };

        if expired {
            entries.pop(key);
            log::debug!("Cache entry for {} expired", key);
            return None;
        }

        entries.get(key).map(|entry| entry.value.clone())
    }

    pub async fn insert(&self, key: impl Into<String>, value: V) {
        let mut entries = self.entries.lock().await;
        entries.put(
            key.into(),
            CachedEntry {
                value,
                inserted_at: Instant::now(),
            },
        );
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }

    pub async fn clear(&self) {
        self.entries.lock().await.clear();
    }

    fn is_expired(&self, entry: &CachedEntry<V>) -> bool {
        self.ttl
            .map(|ttl| entry.inserted_at.elapsed() >= ttl)
            .unwrap_or(false)
    }
}
