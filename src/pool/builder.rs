//! Pool Builder Module
//!
//! Constructs candidate pools from the backing source, applying
//! anti-repetition filtering and the backfill policy that keeps exams
//! deliverable once the bank runs dry.

use std::collections::HashSet;

use tracing::debug;

use crate::error::{PoolCacheError, Result};
use crate::models::{ExamQuestionConfig, Question};
use crate::pool::SubsetSelector;
use crate::source::{QuestionQuery, QuestionSource};

// == Built Pool ==
/// A freshly constructed pool.
///
/// The first `fresh_count` questions are shuffled never-seen candidates;
/// anything after that was re-admitted by backfill, ordered oldest-first.
/// Serving code that cares about novelty drains the fresh segment before
/// touching the tail.
#[derive(Debug, Clone)]
pub struct BuiltPool {
    pub questions: Vec<Question>,
    pub fresh_count: usize,
}

impl BuiltPool {
    /// True when backfill had to re-admit previously-seen questions.
    pub fn has_backfill(&self) -> bool {
        self.fresh_count < self.questions.len()
    }
}

// == Pool Builder ==
/// Queries the backing source and assembles anti-repetition pools.
#[derive(Debug, Clone)]
pub struct PoolBuilder {
    /// Pool size as a multiple of the requested question count
    multiplier: usize,
    /// Hard ceiling on candidates fetched per query
    query_hard_limit: usize,
}

impl PoolBuilder {
    pub fn new(multiplier: usize, query_hard_limit: usize) -> Self {
        Self {
            multiplier,
            query_hard_limit,
        }
    }

    /// Candidate fetch size for the attempt-tracked path: twice the pool
    /// target, to leave filtering headroom, capped at the hard limit.
    pub fn tracked_fetch_limit(&self, total_questions: usize) -> usize {
        (total_questions * self.multiplier * 2).min(self.query_hard_limit)
    }

    /// Candidate fetch size for the legacy path: the plain pool target.
    pub fn legacy_fetch_limit(&self, total_questions: usize) -> usize {
        (total_questions * self.multiplier).min(self.query_hard_limit)
    }

    // == Build ==
    /// Builds a pool for one acquisition on the attempt-tracked path.
    ///
    /// `attempt_count` is the number of attempts already recorded;
    /// `used_ids` the identities this user has been served before. Source
    /// failures propagate unchanged. An empty result is legitimate.
    pub async fn build(
        &self,
        source: &dyn QuestionSource,
        config: &ExamQuestionConfig,
        attempt_count: u32,
        used_ids: &HashSet<String>,
        selector: &SubsetSelector,
    ) -> Result<BuiltPool> {
        let query = QuestionQuery {
            difficulty: config.difficulty,
            categories: config.categories.clone(),
            tags: config.tags.clone(),
            limit: self.tracked_fetch_limit(config.total_questions),
            newest_first: true,
        };

        let candidates = source
            .query(&query)
            .await
            .map_err(PoolCacheError::SourceQueryFailed)?;
        let candidates = dedupe_by_id(candidates);

        // First attempt: nothing to avoid, every candidate is fresh.
        if attempt_count == 0 || used_ids.is_empty() {
            let mut questions = candidates;
            selector.shuffle(&mut questions);
            let fresh_count = questions.len();
            return Ok(BuiltPool {
                questions,
                fresh_count,
            });
        }

        let (mut fresh, seen): (Vec<Question>, Vec<Question>) = candidates
            .into_iter()
            .partition(|q| !used_ids.contains(&q.id));
        selector.shuffle(&mut fresh);

        let target = config.total_questions * self.multiplier;
        let fresh_count = fresh.len();
        let mut questions = fresh;

        if questions.len() < target {
            // Bank exhausted for this user: re-admit seen questions,
            // oldest first, until the deficit is covered or nothing is
            // left. Deliverability beats strict novelty here.
            let deficit = target - questions.len();
            let readmitted = seen.into_iter().rev().take(deficit);
            questions.extend(readmitted);

            debug!(
                fresh = fresh_count,
                backfilled = questions.len() - fresh_count,
                target,
                "pool backfilled with previously seen questions"
            );
        }

        Ok(BuiltPool {
            questions,
            fresh_count,
        })
    }
}

/// Keeps the first occurrence of each identity, preserving order.
fn dedupe_by_id(candidates: Vec<Question>) -> Vec<Question> {
    let mut seen = HashSet::with_capacity(candidates.len());
    candidates
        .into_iter()
        .filter(|q| seen.insert(q.id.clone()))
        .collect()
}
