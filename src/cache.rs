//! In-memory feed cache.
//!
//! Holds the most recent normalized items per feed identifier. Entries are
//! only replaced or invalidated, never evicted; the dispatcher decides
//! freshness and refetches stale entries.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::{Duration, Instant};

use crate::feed::NewsItem;

/// A cached feed snapshot.
#[derive(Debug, Clone)]
pub struct CachedFeed {
    /// Items in source order.
    pub items: Arc<Vec<NewsItem>>,
    /// When the items were stored.
    pub captured_at: Instant,
    /// How long the snapshot stays fresh.
    pub ttl: Duration,
}

impl CachedFeed {
    /// Whether the snapshot can still be served without refetching.
    pub fn is_fresh(&self) -> bool {
        self.is_fresh_at(Instant::now())
    }

    /// Freshness as of `now`: `now - captured_at < ttl`.
    pub fn is_fresh_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.captured_at) < self.ttl
    }
}

/// Feed cache keyed by feed identifier.
#[derive(Debug, Default)]
pub struct FeedCache {
    entries: RwLock<HashMap<String, CachedFeed>>,
}

impl FeedCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the entry for a feed, fresh or not.
    pub fn get(&self, feed_id: &str) -> Option<CachedFeed> {
        self.read().get(feed_id).cloned()
    }

    /// Store items for a feed, replacing any previous entry.
    pub fn put(&self, feed_id: &str, items: Vec<NewsItem>, ttl: Duration) -> CachedFeed {
        let entry = CachedFeed {
            items: Arc::new(items),
            captured_at: Instant::now(),
            ttl,
        };
        self.write().insert(feed_id.to_string(), entry.clone());
        entry
    }

    /// Remove the entry for a feed. Returns whether one was present.
    pub fn invalidate(&self, feed_id: &str) -> bool {
        self.write().remove(feed_id).is_some()
    }

    /// Number of cached feeds.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Whether the cache holds no feeds.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    // A panic while holding the lock cannot leave a half-written entry,
    // so poisoned guards are recovered.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, CachedFeed>> {
        self.entries.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, CachedFeed>> {
        self.entries.write().unwrap_or_else(|e| e.into_inner())
    }
}
