//! Cache Store Module
//!
//! Generic bounded cache combining HashMap storage with LRU tracking and
//! TTL expiration. Carries no exam semantics so the eviction policy can be
//! exercised on its own.

use std::collections::HashMap;

use crate::cache::{CacheEntry, CacheStats, LruTracker};

// == TTL + LRU Cache ==
/// Bounded key-value cache with a fixed per-entry TTL and approximate-LRU
/// eviction on overflow.
#[derive(Debug)]
pub struct TtlLruCache<V> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// LRU access tracker
    lru: LruTracker,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    max_entries: usize,
    /// TTL in seconds applied to every entry
    ttl_secs: u64,
}

impl<V> TtlLruCache<V> {
    // == Constructor ==
    /// Creates a new cache holding at most `max_entries` entries, each
    /// living `ttl_secs` from insertion.
    pub fn new(max_entries: usize, ttl_secs: u64) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            max_entries,
            ttl_secs,
        }
    }

    // == Get ==
    /// Looks up an entry by key.
    ///
    /// Expired entries are logically absent (counted as misses) but are
    /// left in place for the periodic sweep to reclaim. Recency is not
    /// refreshed here; callers that serve from the entry follow up with
    /// [`TtlLruCache::touch`].
    pub fn get(&mut self, key: &str) -> Option<&CacheEntry<V>> {
        let live = self
            .entries
            .get(key)
            .map(|entry| !entry.is_expired())
            .unwrap_or(false);

        if live {
            self.stats.record_hit();
            self.entries.get(key)
        } else {
            self.stats.record_miss();
            None
        }
    }

    // == Insert ==
    /// Inserts a value under `key`, evicting the single least recently
    /// used entry first if the cache is at capacity.
    ///
    /// An existing key is overwritten with a fresh entry (new TTL, usage
    /// count reset): when two concurrent misses both build a value for the
    /// same key, the later write wins.
    pub fn insert(&mut self, key: String, value: V) {
        let is_overwrite = self.entries.contains_key(&key);

        if !is_overwrite && self.entries.len() >= self.max_entries {
            if let Some(evicted_key) = self.lru.evict_oldest() {
                self.entries.remove(&evicted_key);
                self.stats.record_eviction();
            }
        }

        self.entries.insert(key.clone(), CacheEntry::new(value, self.ttl_secs));
        self.lru.touch(&key);
        self.stats.set_total_entries(self.entries.len());
    }

    // == Touch ==
    /// Records a use of `key`: bumps its usage count, refreshes recency.
    /// Unknown keys are ignored.
    pub fn touch(&mut self, key: &str) {
        if let Some(entry) = self.entries.get_mut(key) {
            entry.touch();
            self.lru.touch(key);
        }
    }

    // == Sweep Expired ==
    /// Removes every expired entry, returning how many were reclaimed.
    pub fn sweep_expired(&mut self) -> usize {
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();

        let count = expired_keys.len();

        for key in expired_keys {
            self.entries.remove(&key);
            self.lru.remove(&key);
        }

        self.stats.record_expired(count as u64);
        self.stats.set_total_entries(self.entries.len());
        count
    }

    // == Retain ==
    /// Keeps only the entries for which `pred` returns true, returning the
    /// number removed.
    pub fn retain<F>(&mut self, mut pred: F) -> usize
    where
        F: FnMut(&str, &CacheEntry<V>) -> bool,
    {
        let doomed: Vec<String> = self
            .entries
            .iter()
            .filter(|(key, entry)| !pred(key, entry))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &doomed {
            self.entries.remove(key);
            self.lru.remove(key);
        }

        self.stats.set_total_entries(self.entries.len());
        doomed.len()
    }

    // == Clear ==
    /// Removes all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.lru.clear();
        self.stats.set_total_entries(0);
    }

    // == Iter ==
    /// Iterates over all entries, expired ones included.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &CacheEntry<V>)> {
        self.entries.iter()
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    /// Lifetime hit rate.
    pub fn hit_rate(&self) -> f64 {
        self.stats.hit_rate()
    }

    /// Returns the current number of entries, expired-but-unswept included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
