//! Configuration Module
//!
//! Handles loading and managing cache configuration from environment variables.

use std::env;

/// Question pool cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct PoolCacheConfig {
    /// Pool time-to-live in seconds
    pub cache_ttl_secs: u64,
    /// Maximum number of pools the store can hold
    pub max_pools: usize,
    /// Pool size as a multiple of the requested question count
    pub pool_size_multiplier: usize,
    /// Maximum attempts per (user, exam) pair
    pub max_attempts: u32,
    /// Hard ceiling on candidates fetched per backing-source query
    pub query_hard_limit: usize,
    /// Interval between expired-pool sweeps, in seconds
    pub pool_sweep_interval_secs: u64,
    /// Interval between idle-history sweeps, in seconds
    pub history_sweep_interval_secs: u64,
    /// Idle age after which an attempt history is purged, in seconds
    pub history_max_idle_secs: u64,
}

impl PoolCacheConfig {
    /// Creates a new PoolCacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `POOL_CACHE_TTL_SECS` - Pool TTL in seconds (default: 1800)
    /// - `POOL_CACHE_MAX_POOLS` - Maximum cached pools (default: 100)
    /// - `POOL_SIZE_MULTIPLIER` - Pool size multiplier (default: 3)
    /// - `MAX_EXAM_ATTEMPTS` - Attempt cap per user and exam (default: 5)
    /// - `POOL_QUERY_HARD_LIMIT` - Candidate fetch ceiling (default: 2000)
    /// - `POOL_SWEEP_INTERVAL_SECS` - Expired-pool sweep frequency (default: 600)
    /// - `HISTORY_SWEEP_INTERVAL_SECS` - Idle-history sweep frequency (default: 3600)
    /// - `HISTORY_MAX_IDLE_SECS` - History idle age before purge (default: 604800, 7 days)
    pub fn from_env() -> Self {
        Self {
            cache_ttl_secs: env_or("POOL_CACHE_TTL_SECS", 1800),
            max_pools: env_or("POOL_CACHE_MAX_POOLS", 100),
            pool_size_multiplier: env_or("POOL_SIZE_MULTIPLIER", 3),
            max_attempts: env_or("MAX_EXAM_ATTEMPTS", 5),
            query_hard_limit: env_or("POOL_QUERY_HARD_LIMIT", 2000),
            pool_sweep_interval_secs: env_or("POOL_SWEEP_INTERVAL_SECS", 600),
            history_sweep_interval_secs: env_or("HISTORY_SWEEP_INTERVAL_SECS", 3600),
            history_max_idle_secs: env_or("HISTORY_MAX_IDLE_SECS", 604_800),
        }
    }
}

impl Default for PoolCacheConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: 1800,
            max_pools: 100,
            pool_size_multiplier: 3,
            max_attempts: 5,
            query_hard_limit: 2000,
            pool_sweep_interval_secs: 600,
            history_sweep_interval_secs: 3600,
            history_max_idle_secs: 604_800,
        }
    }
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
