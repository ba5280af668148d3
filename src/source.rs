//! Question Source Interface
//!
//! The seam between the cache and the question persistence backend. The
//! cache never talks to storage directly; it issues [`QuestionQuery`]s
//! through this trait and treats the results as opaque records.

use async_trait::async_trait;

use crate::models::{Difficulty, Question};

// == Question Query ==
/// Candidate query sent to the backing question source.
///
/// `categories`/`tags` are containment filters: empty means unfiltered.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionQuery {
    pub difficulty: Difficulty,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    /// Maximum number of candidates to return
    pub limit: usize,
    /// When true, order results newest-first by creation time
    pub newest_first: bool,
}

// == Question Source Trait ==
/// Backing store of questions.
///
/// Implementations own retry, timeout and connection concerns; errors are
/// propagated to cache callers unchanged.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    async fn query(&self, query: &QuestionQuery) -> anyhow::Result<Vec<Question>>;
}
