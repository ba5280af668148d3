//! Response DTOs for the question pool cache
//!
//! Defines the structures returned to callers by the cache service.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::Question;

// == Cache Info Kind ==
/// How the served question set relates to the cache and the user's history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheInfoKind {
    /// Served from an already-cached pool (possibly built for another user)
    Shared,
    /// Freshly built pool and every served question was new to the user
    Unique,
    /// The served set had to include previously-seen questions (backfill)
    Repetition,
}

// == Cache Info ==
/// Per-acquisition cache metadata.
#[derive(Debug, Clone, Serialize)]
pub struct CacheInfo {
    /// Relation of the served set to cache and history
    pub kind: CacheInfoKind,
    /// Lifetime hit rate of the pool store
    pub hit_rate: f64,
    /// Version of the pool the set was drawn from (attempt number at
    /// creation; 0 for the attempt-less legacy path)
    pub version: u32,
}

// == Acquired Questions ==
/// Result of one successful question acquisition.
///
/// `questions` may be shorter than requested, or empty, when the bank is
/// exhausted even after backfill; that is not an error.
#[derive(Debug, Clone, Serialize)]
pub struct AcquiredQuestions {
    pub questions: Vec<Question>,
    pub cache_info: CacheInfo,
}

// == Pool Usage ==
/// Usage figure for a single cached pool.
#[derive(Debug, Clone, Serialize)]
pub struct PoolUsage {
    pub key: String,
    pub usage_count: u64,
}

// == Attempt Stats ==
/// Aggregate attempt-tracker statistics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AttemptStats {
    /// Number of (user, exam) histories currently tracked
    pub tracked_histories: usize,
    /// Total attempts recorded across all histories
    pub total_attempts: u64,
}

// == User Attempt Stats ==
/// Attempt statistics for one (user, exam) pair.
#[derive(Debug, Clone, Serialize)]
pub struct UserAttemptStats {
    pub attempt_count: u32,
    pub attempts_remaining: u32,
    pub used_pool_versions: Vec<u32>,
    pub last_attempt_at: DateTime<Utc>,
}

// == Cache Service Stats ==
/// Operational snapshot of the whole cache service.
#[derive(Debug, Clone, Serialize)]
pub struct CacheServiceStats {
    pub total_pools: usize,
    pub hit_rate: f64,
    /// Rough serialized size of all cached pools, in bytes
    pub memory_usage_estimate_bytes: usize,
    pub most_used_pools: Vec<PoolUsage>,
    pub attempt_stats: AttemptStats,
}
