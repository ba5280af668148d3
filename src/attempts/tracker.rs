//! User Attempt Tracker
//!
//! Per-(user, exam) attempt counting, pool-version history and the served
//! identities that drive anti-repetition filtering.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::error::{PoolCacheError, Result};
use crate::models::{AttemptStats, Question, UserAttemptStats};

// == User Attempt History ==
/// Attempt record for one (user, exam) pair.
///
/// Created lazily on first access; purged by the idle sweep. Besides the
/// pool versions the user has drawn from, the history remembers the
/// identities actually served — recorded pool versions alone cannot bound
/// repetition once a pool has expired, been evicted, or was over-fetched.
#[derive(Debug, Clone, Serialize)]
pub struct UserAttemptHistory {
    pub user_id: String,
    pub exam_id: String,
    pub attempt_count: u32,
    pub used_pool_versions: Vec<u32>,
    pub served_question_ids: HashSet<String>,
    pub last_attempt_at: DateTime<Utc>,
}

impl UserAttemptHistory {
    fn new(user_id: String, exam_id: String) -> Self {
        Self {
            user_id,
            exam_id,
            attempt_count: 0,
            used_pool_versions: Vec::new(),
            served_question_ids: HashSet::new(),
            last_attempt_at: Utc::now(),
        }
    }
}

// == User Attempt Tracker ==
/// Owns all attempt histories.
#[derive(Debug, Default)]
pub struct UserAttemptTracker {
    histories: HashMap<(String, String), UserAttemptHistory>,
}

impl UserAttemptTracker {
    pub fn new() -> Self {
        Self::default()
    }

    // == Get Or Create ==
    /// Returns the history for (user, exam), creating an empty one on
    /// first access.
    pub fn get_or_create(&mut self, user_id: &str, exam_id: &str) -> &UserAttemptHistory {
        self.histories
            .entry((user_id.to_string(), exam_id.to_string()))
            .or_insert_with(|| UserAttemptHistory::new(user_id.to_string(), exam_id.to_string()))
    }

    // == Next Attempt ==
    /// Computes the attempt number the next acquisition would carry and
    /// checks it against `max_attempts`.
    ///
    /// Rejection happens before the attempt is recorded: a failed check
    /// leaves the history exactly as it was (lazy creation aside).
    pub fn next_attempt(&mut self, user_id: &str, exam_id: &str, max_attempts: u32) -> Result<u32> {
        let attempted = self.get_or_create(user_id, exam_id).attempt_count + 1;
        if attempted > max_attempts {
            return Err(PoolCacheError::AttemptLimitExceeded {
                attempted,
                max: max_attempts,
            });
        }
        Ok(attempted)
    }

    // == Record Attempt ==
    /// Records a successful acquisition: sets the attempt count, appends
    /// the pool version drawn from, remembers the served identities and
    /// refreshes the idle clock.
    pub fn record_attempt(
        &mut self,
        user_id: &str,
        exam_id: &str,
        attempt_number: u32,
        pool_version: u32,
        served: &[Question],
    ) {
        let history = self
            .histories
            .entry((user_id.to_string(), exam_id.to_string()))
            .or_insert_with(|| UserAttemptHistory::new(user_id.to_string(), exam_id.to_string()));

        history.attempt_count = attempt_number;
        history.used_pool_versions.push(pool_version);
        history
            .served_question_ids
            .extend(served.iter().map(|q| q.id.clone()));
        history.last_attempt_at = Utc::now();
    }

    // == Used Question Ids ==
    /// All identities this user has been served for this exam so far.
    pub fn used_question_ids(&self, user_id: &str, exam_id: &str) -> HashSet<String> {
        self.histories
            .get(&(user_id.to_string(), exam_id.to_string()))
            .map(|h| h.served_question_ids.clone())
            .unwrap_or_default()
    }

    // == Sweep Idle ==
    /// Purges histories whose last attempt is older than `max_idle_secs`,
    /// returning the number removed.
    pub fn sweep_idle(&mut self, max_idle_secs: u64) -> usize {
        let cutoff = Utc::now() - Duration::seconds(max_idle_secs as i64);
        let before = self.histories.len();
        self.histories.retain(|_, h| h.last_attempt_at > cutoff);
        before - self.histories.len()
    }

    // == User Stats ==
    /// Attempt statistics for one (user, exam), if any history exists.
    pub fn user_stats(
        &self,
        user_id: &str,
        exam_id: &str,
        max_attempts: u32,
    ) -> Option<UserAttemptStats> {
        self.histories
            .get(&(user_id.to_string(), exam_id.to_string()))
            .map(|h| UserAttemptStats {
                attempt_count: h.attempt_count,
                attempts_remaining: max_attempts.saturating_sub(h.attempt_count),
                used_pool_versions: h.used_pool_versions.clone(),
                last_attempt_at: h.last_attempt_at,
            })
    }

    // == Stats ==
    /// Aggregate statistics across all histories.
    pub fn stats(&self) -> AttemptStats {
        AttemptStats {
            tracked_histories: self.histories.len(),
            total_attempts: self
                .histories
                .values()
                .map(|h| u64::from(h.attempt_count))
                .sum(),
        }
    }

    /// Number of tracked histories.
    pub fn len(&self) -> usize {
        self.histories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.histories.is_empty()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn questions(ids: &[&str]) -> Vec<Question> {
        ids.iter().map(|id| Question::new(*id)).collect()
    }

    #[test]
    fn test_get_or_create_lazily() {
        let mut tracker = UserAttemptTracker::new();
        assert!(tracker.is_empty());

        let history = tracker.get_or_create("u1", "e1");
        assert_eq!(history.attempt_count, 0);
        assert!(history.used_pool_versions.is_empty());
        assert_eq!(tracker.len(), 1);

        // Second access reuses the same history
        tracker.get_or_create("u1", "e1");
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn test_histories_are_scoped_per_user_and_exam() {
        let mut tracker = UserAttemptTracker::new();
        tracker.record_attempt("u1", "e1", 1, 1, &questions(&["a"]));
        tracker.record_attempt("u1", "e2", 1, 1, &questions(&["b"]));
        tracker.record_attempt("u2", "e1", 1, 1, &questions(&["c"]));

        assert_eq!(tracker.len(), 3);
        assert_eq!(
            tracker.used_question_ids("u1", "e1"),
            HashSet::from(["a".to_string()])
        );
        assert_eq!(
            tracker.used_question_ids("u2", "e1"),
            HashSet::from(["c".to_string()])
        );
    }

    #[test]
    fn test_next_attempt_increments_and_caps() {
        let mut tracker = UserAttemptTracker::new();

        assert_eq!(tracker.next_attempt("u1", "e1", 5).unwrap(), 1);
        tracker.record_attempt("u1", "e1", 1, 1, &[]);
        assert_eq!(tracker.next_attempt("u1", "e1", 5).unwrap(), 2);

        for n in 2..=5 {
            tracker.record_attempt("u1", "e1", n, n, &[]);
        }

        let err = tracker.next_attempt("u1", "e1", 5).unwrap_err();
        assert!(matches!(
            err,
            PoolCacheError::AttemptLimitExceeded { attempted: 6, max: 5 }
        ));
        // The rejected check must not have touched the count
        assert_eq!(tracker.get_or_create("u1", "e1").attempt_count, 5);
    }

    #[test]
    fn test_record_attempt_accumulates_history() {
        let mut tracker = UserAttemptTracker::new();

        tracker.record_attempt("u1", "e1", 1, 1, &questions(&["a", "b"]));
        tracker.record_attempt("u1", "e1", 2, 2, &questions(&["b", "c"]));

        let history = tracker.get_or_create("u1", "e1");
        assert_eq!(history.attempt_count, 2);
        assert_eq!(history.used_pool_versions, vec![1, 2]);
        assert_eq!(
            tracker.used_question_ids("u1", "e1"),
            HashSet::from(["a".to_string(), "b".to_string(), "c".to_string()])
        );
    }

    #[test]
    fn test_used_question_ids_unknown_user_is_empty() {
        let tracker = UserAttemptTracker::new();
        assert!(tracker.used_question_ids("ghost", "e1").is_empty());
    }

    #[test]
    fn test_sweep_idle_purges_stale_histories() {
        let mut tracker = UserAttemptTracker::new();
        tracker.record_attempt("stale", "e1", 1, 1, &[]);

        std::thread::sleep(std::time::Duration::from_millis(20));
        tracker.record_attempt("active", "e1", 1, 1, &[]);

        // With a zero idle allowance everything older than "now" goes
        std::thread::sleep(std::time::Duration::from_millis(20));
        let removed = tracker.sweep_idle(0);
        assert_eq!(removed, 2);
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_sweep_idle_keeps_recent_histories() {
        let mut tracker = UserAttemptTracker::new();
        tracker.record_attempt("u1", "e1", 1, 1, &[]);

        assert_eq!(tracker.sweep_idle(3600), 0);
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn test_user_stats() {
        let mut tracker = UserAttemptTracker::new();
        assert!(tracker.user_stats("u1", "e1", 5).is_none());

        tracker.record_attempt("u1", "e1", 1, 1, &[]);
        tracker.record_attempt("u1", "e1", 2, 1, &[]);

        let stats = tracker.user_stats("u1", "e1", 5).unwrap();
        assert_eq!(stats.attempt_count, 2);
        assert_eq!(stats.attempts_remaining, 3);
        assert_eq!(stats.used_pool_versions, vec![1, 1]);
    }

    #[test]
    fn test_aggregate_stats() {
        let mut tracker = UserAttemptTracker::new();
        tracker.record_attempt("u1", "e1", 3, 1, &[]);
        tracker.record_attempt("u2", "e1", 2, 1, &[]);

        let stats = tracker.stats();
        assert_eq!(stats.tracked_histories, 2);
        assert_eq!(stats.total_attempts, 5);
    }
}
