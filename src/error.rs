//! Error types for the question pool cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Pool Cache Error Enum ==
/// Unified error type for the question pool cache.
///
/// Only two conditions are ever visible to callers: hitting the attempt
/// limit and a failed backing-source query. An exhausted question bank is
/// not an error; it surfaces as an empty or reduced-novelty result.
#[derive(Error, Debug)]
pub enum PoolCacheError {
    /// The requested attempt number exceeds the configured maximum.
    ///
    /// Terminal for the caller; no cache or history state is mutated.
    #[error("attempt {attempted} exceeds the maximum of {max} attempts")]
    AttemptLimitExceeded { attempted: u32, max: u32 },

    /// The backing question source failed. Propagated unchanged; any
    /// retry policy belongs to the caller.
    #[error("question source query failed: {0}")]
    SourceQueryFailed(#[source] anyhow::Error),
}

// == Result Type Alias ==
/// Convenience Result type for the question pool cache.
pub type Result<T> = std::result::Result<T, PoolCacheError>;
