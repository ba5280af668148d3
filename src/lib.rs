//! Question Pool Cache - an in-memory caching engine for exam question sets
//!
//! Serves randomized question subsets from cached candidate pools with
//! per-user anti-repetition, TTL expiry and approximate-LRU eviction.

pub mod attempts;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod pool;
pub mod service;
pub mod source;
pub mod tasks;

pub use config::PoolCacheConfig;
pub use error::{PoolCacheError, Result};
pub use service::ExamCacheService;
pub use source::{QuestionQuery, QuestionSource};
pub use tasks::{spawn_history_sweep_task, spawn_pool_sweep_task};
