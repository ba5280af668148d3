//! Question Pool Store
//!
//! The domain face of the generic TTL/LRU cache: pools of questions keyed
//! by configuration, plus the reporting the stats endpoint needs.

use serde::Serialize;

use crate::cache::{CacheEntry, CacheStats, TtlLruCache};
use crate::models::{ExamQuestionConfig, PoolUsage, Question};

// == Question Pool ==
/// The cached value for one pool key.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionPool {
    /// Candidate superset subsets are drawn from
    pub questions: Vec<Question>,
    /// Configuration the pool was built for
    pub configuration: ExamQuestionConfig,
    /// Attempt number at creation; 0 for the attempt-less legacy path
    pub version: u32,
}

// == Question Pool Store ==
/// Bounded store of question pools with TTL expiry and LRU eviction.
#[derive(Debug)]
pub struct QuestionPoolStore {
    cache: TtlLruCache<QuestionPool>,
}

impl QuestionPoolStore {
    /// Creates a store holding at most `max_pools`, each living
    /// `ttl_secs` from insertion.
    pub fn new(max_pools: usize, ttl_secs: u64) -> Self {
        Self {
            cache: TtlLruCache::new(max_pools, ttl_secs),
        }
    }

    // == Get ==
    /// Looks up a pool. Expired pools are logically absent; reclaiming
    /// them is the sweep's job.
    pub fn get(&mut self, key: &str) -> Option<&CacheEntry<QuestionPool>> {
        self.cache.get(key)
    }

    // == Put ==
    /// Inserts a pool, evicting the least recently used one first when at
    /// capacity. Re-inserting an existing key overwrites it (later build
    /// wins).
    pub fn put(
        &mut self,
        key: String,
        questions: Vec<Question>,
        configuration: ExamQuestionConfig,
        version: u32,
    ) {
        self.cache.insert(
            key,
            QuestionPool {
                questions,
                configuration,
                version,
            },
        );
    }

    // == Touch ==
    /// Records a hit on a pool: usage count and recency.
    pub fn touch(&mut self, key: &str) {
        self.cache.touch(key);
    }

    // == Sweep Expired ==
    /// Removes all expired pools, returning the count.
    pub fn sweep_expired(&mut self) -> usize {
        self.cache.sweep_expired()
    }

    // == Clear All ==
    /// Drops every cached pool.
    pub fn clear_all(&mut self) {
        self.cache.clear();
    }

    // == Clear By Category ==
    /// Drops every pool whose configuration includes `category`, returning
    /// the number removed.
    pub fn clear_by_category(&mut self, category: &str) -> usize {
        self.cache.retain(|_, entry| {
            !entry
                .value
                .configuration
                .categories
                .iter()
                .any(|c| c == category)
        })
    }

    // == Most Used ==
    /// The `limit` most-served pools, descending by usage count.
    pub fn most_used(&self, limit: usize) -> Vec<PoolUsage> {
        let mut usage: Vec<PoolUsage> = self
            .cache
            .iter()
            .map(|(key, entry)| PoolUsage {
                key: key.clone(),
                usage_count: entry.usage_count,
            })
            .collect();
        usage.sort_by(|a, b| b.usage_count.cmp(&a.usage_count).then(a.key.cmp(&b.key)));
        usage.truncate(limit);
        usage
    }

    // == Memory Estimate ==
    /// Rough serialized footprint of all cached pools, in bytes. An
    /// operational gauge, not an allocator measurement.
    pub fn memory_estimate_bytes(&self) -> usize {
        self.cache
            .iter()
            .map(|(key, entry)| {
                let questions = serde_json::to_vec(&entry.value.questions)
                    .map(|bytes| bytes.len())
                    .unwrap_or(0);
                key.len() + questions
            })
            .sum()
    }

    /// Current pool count, expired-but-unswept included.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Lifetime hit rate of the store.
    pub fn hit_rate(&self) -> f64 {
        self.cache.hit_rate()
    }

    /// Container-level statistics snapshot.
    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }
}
