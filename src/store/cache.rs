//! Result cache keyed by canonical query parameters.
//!
//! Entries hold the last successful page for a key together with the
//! bookkeeping for a fetch that may be running for it: the in-flight request
//! id and the tickets waiting on it. Failures only clear that bookkeeping and
//! never touch a stored page.

use super::Ticket;
use crate::domain::PaginatedResult;
use crate::runtime::RequestId;
use std::collections::HashMap;
use std::sync::Arc;

/// Default age below which a cached page is served without refetching.
pub const DEFAULT_FRESHNESS_MS: i64 = 30_000;

/// Default number of keys kept in the cache.
pub const DEFAULT_CAPACITY: usize = 64;

/// State stored for one cache key.
#[derive(Debug, Default)]
pub struct CacheEntry {
    /// Last successful page, shared with every reader.
    pub result: Option<Arc<PaginatedResult>>,
    /// When `result` was stored (plugin clock, milliseconds).
    pub fetched_at_ms: i64,
    /// Attempt currently running or waiting to be retried for this key.
    pub in_flight: Option<RequestId>,
    /// Tickets waiting for the in-flight fetch to settle.
    pub waiters: Vec<Ticket>,
}

impl CacheEntry {
    fn is_evictable(&self) -> bool {
        self.in_flight.is_none() && self.waiters.is_empty()
    }
}

/// Outcome of a cache read.
#[derive(Debug, Clone)]
pub enum CacheLookup {
    /// Younger than the freshness window.
    Fresh(Arc<PaginatedResult>),
    /// Present but old; serve it and refresh in the background.
    Stale(Arc<PaginatedResult>),
    Missing,
}

/// Bounded map from cache key to [`CacheEntry`].
#[derive(Debug)]
pub struct QueryCache {
    entries: HashMap<String, CacheEntry>,
    freshness_ms: i64,
    capacity: usize,
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new(DEFAULT_FRESHNESS_MS, DEFAULT_CAPACITY)
    }
}

impl QueryCache {
    /// Creates an empty cache. A capacity of zero is treated as one.
    #[must_use]
    pub fn new(freshness_ms: i64, capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            freshness_ms,
            capacity: capacity.max(1),
        }
    }

    /// Reads the page stored under `key`, classified by age at `now_ms`.
    #[must_use]
    pub fn lookup(&self, key: &str, now_ms: i64) -> CacheLookup {
        let Some(entry) = self.entries.get(key) else {
            return CacheLookup::Missing;
        };
        let Some(result) = &entry.result else {
            return CacheLookup::Missing;
        };

        if now_ms.saturating_sub(entry.fetched_at_ms) < self.freshness_ms {
            CacheLookup::Fresh(Arc::clone(result))
        } else {
            CacheLookup::Stale(Arc::clone(result))
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&CacheEntry> {
        self.entries.get(key)
    }

    /// Returns the entry for `key`, creating an empty one if needed.
    pub fn entry_mut(&mut self, key: &str) -> &mut CacheEntry {
        self.entries.entry(key.to_string()).or_default()
    }

    /// Stores a successful page and clears the in-flight handle.
    ///
    /// Returns the tickets that were waiting on the key.
    pub fn store(&mut self, key: &str, result: Arc<PaginatedResult>, now_ms: i64) -> Vec<Ticket> {
        let entry = self.entry_mut(key);
        entry.result = Some(result);
        entry.fetched_at_ms = now_ms;
        entry.in_flight = None;
        let waiters = std::mem::take(&mut entry.waiters);

        self.evict_over_capacity(key);
        waiters
    }

    /// Records a failed fetch: clears the in-flight handle and returns the
    /// waiting tickets. A stored page survives; an entry that never held one
    /// is dropped.
    pub fn fail(&mut self, key: &str) -> Vec<Ticket> {
        let Some(entry) = self.entries.get_mut(key) else {
            return Vec::new();
        };
        entry.in_flight = None;
        let waiters = std::mem::take(&mut entry.waiters);

        if entry.result.is_none() {
            self.entries.remove(key);
        }
        waiters
    }

    /// Drops a waiter that will never be answered.
    pub fn forget_waiter(&mut self, key: &str, ticket: Ticket) {
        if let Some(entry) = self.entries.get_mut(key) {
            entry.waiters.retain(|t| *t != ticket);
            if entry.result.is_none() && entry.is_evictable() {
                self.entries.remove(key);
            }
        }
    }

    fn evict_over_capacity(&mut self, keep: &str) {
        while self.entries.len() > self.capacity {
            let victim = self
                .entries
                .iter()
                .filter(|(key, entry)| key.as_str() != keep && entry.is_evictable())
                .min_by_key(|(_, entry)| entry.fetched_at_ms)
                .map(|(key, _)| key.clone());

            let Some(victim) = victim else { break };
            tracing::debug!(key = %victim, "evicting cache entry");
            self.entries.remove(&victim);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::listing::fixtures::{listing, page};

    fn sample() -> Arc<PaginatedResult> {
        Arc::new(page(vec![listing(1, "Cafe")]))
    }

    #[test]
    fn entries_go_stale_after_window() {
        let mut cache = QueryCache::new(30_000, 8);
        cache.store("k", sample(), 1_000);

        assert!(matches!(cache.lookup("k", 30_999), CacheLookup::Fresh(_)));
        assert!(matches!(cache.lookup("k", 31_000), CacheLookup::Stale(_)));
        assert!(matches!(cache.lookup("other", 1_000), CacheLookup::Missing));
    }

    #[test]
    fn failure_keeps_stored_page() {
        let mut cache = QueryCache::default();
        cache.store("k", sample(), 0);
        cache.entry_mut("k").in_flight = Some(3);
        cache.entry_mut("k").waiters.push(Ticket(9));

        assert_eq!(cache.fail("k"), vec![Ticket(9)]);
        let entry = cache.get("k").unwrap();
        assert!(entry.result.is_some());
        assert!(entry.in_flight.is_none());
    }

    #[test]
    fn failure_drops_empty_entry() {
        let mut cache = QueryCache::default();
        cache.entry_mut("k").in_flight = Some(1);
        cache.fail("k");
        assert!(cache.is_empty());
    }

    #[test]
    fn evicts_oldest_idle_entry() {
        let mut cache = QueryCache::new(30_000, 2);
        cache.store("a", sample(), 10);
        cache.store("b", sample(), 20);
        cache.entry_mut("b").in_flight = Some(5);
        cache.store("c", sample(), 30);

        assert_eq!(cache.len(), 2);
        assert!(cache.get("a").is_none());
        assert!(cache.get("b").is_some());
        assert!(cache.get("c").is_some());
    }

    #[test]
    fn busy_entries_are_never_evicted() {
        let mut cache = QueryCache::new(30_000, 1);
        cache.store("a", sample(), 10);
        cache.entry_mut("a").waiters.push(Ticket(1));
        cache.store("b", sample(), 20);

        assert_eq!(cache.len(), 2);
        assert!(cache.get("a").is_some());
    }
}
