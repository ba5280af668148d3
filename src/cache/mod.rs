//! Cache Module
//!
//! Generic in-memory caching with TTL expiration and approximate-LRU
//! eviction, independent of any exam semantics.

mod entry;
mod lru;
mod stats;
mod store;


// Re-export public types
pub use entry::{current_timestamp_ms, CacheEntry};
pub use lru::LruTracker;
pub use stats::CacheStats;
pub use store::TtlLruCache;
