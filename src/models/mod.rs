//! Data Models Module
//!
//! Domain types consumed and produced by the question pool cache.

pub mod question;
pub mod responses;

pub use question::{Difficulty, ExamQuestionConfig, Question};
pub use responses::{
    AcquiredQuestions, AttemptStats, CacheInfo, CacheInfoKind, CacheServiceStats, PoolUsage,
    UserAttemptStats,
};
