//! Maintenance Sweep Tasks
//!
//! Background tasks that reclaim expired pools and idle attempt histories.
//! Both run on their own timers, independent of request handling, and a
//! quiet tick is never a reason to stop looping.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::attempts::UserAttemptTracker;
use crate::pool::QuestionPoolStore;

// == Pool Sweep ==
/// Spawns the expired-pool sweep.
///
/// Every `interval_secs` the task takes a write lock just long enough to
/// drop expired pools. The returned handle can be aborted for shutdown.
pub fn spawn_pool_sweep_task(
    pools: Arc<RwLock<QuestionPoolStore>>,
    interval_secs: u64,
) -> JoinHandle<()> {
    let interval = Duration::from_secs(interval_secs);

    tokio::spawn(async move {
        info!(interval_secs, "starting expired-pool sweep task");

        loop {
            tokio::time::sleep(interval).await;

            let removed = {
                let mut pools = pools.write().await;
                pools.sweep_expired()
            };

            if removed > 0 {
                info!(removed, "pool sweep removed expired pools");
            } else {
                debug!("pool sweep found no expired pools");
            }
        }
    })
}

// == History Sweep ==
/// Spawns the idle attempt-history sweep.
///
/// Every `interval_secs` the task purges histories whose last attempt is
/// older than `max_idle_secs`.
pub fn spawn_history_sweep_task(
    attempts: Arc<RwLock<UserAttemptTracker>>,
    interval_secs: u64,
    max_idle_secs: u64,
) -> JoinHandle<()> {
    let interval = Duration::from_secs(interval_secs);

    tokio::spawn(async move {
        info!(interval_secs, max_idle_secs, "starting attempt-history sweep task");

        loop {
            tokio::time::sleep(interval).await;

            let removed = {
                let mut attempts = attempts.write().await;
                attempts.sweep_idle(max_idle_secs)
            };

            if removed > 0 {
                info!(removed, "history sweep purged idle attempt histories");
            } else {
                debug!("history sweep found no idle histories");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Difficulty, ExamQuestionConfig, Question};

    fn pool_questions(n: usize) -> Vec<Question> {
        (0..n).map(|i| Question::new(format!("q-{i}"))).collect()
    }

    #[tokio::test]
    async fn test_pool_sweep_removes_expired_pools() {
        // 1 second TTL so the first tick finds work
        let pools = Arc::new(RwLock::new(QuestionPoolStore::new(100, 1)));
        {
            let mut pools = pools.write().await;
            pools.put(
                "k1".to_string(),
                pool_questions(3),
                ExamQuestionConfig::new(Difficulty::Easy, 3),
                1,
            );
        }

        let handle = spawn_pool_sweep_task(pools.clone(), 1);
        tokio::time::sleep(Duration::from_millis(2500)).await;

        assert_eq!(pools.read().await.len(), 0, "expired pool should be swept");
        handle.abort();
    }

    #[tokio::test]
    async fn test_pool_sweep_preserves_live_pools() {
        let pools = Arc::new(RwLock::new(QuestionPoolStore::new(100, 3600)));
        {
            let mut pools = pools.write().await;
            pools.put(
                "k1".to_string(),
                pool_questions(3),
                ExamQuestionConfig::new(Difficulty::Easy, 3),
                1,
            );
        }

        let handle = spawn_pool_sweep_task(pools.clone(), 1);
        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert_eq!(pools.read().await.len(), 1, "live pool must survive");
        handle.abort();
    }

    #[tokio::test]
    async fn test_history_sweep_purges_idle_histories() {
        let attempts = Arc::new(RwLock::new(UserAttemptTracker::new()));
        attempts.write().await.record_attempt("u1", "e1", 1, 1, &[]);

        // Zero idle allowance: everything is stale by the first tick
        let handle = spawn_history_sweep_task(attempts.clone(), 1, 0);
        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert!(attempts.read().await.is_empty());
        handle.abort();
    }

    #[tokio::test]
    async fn test_sweep_tasks_can_be_aborted() {
        let pools = Arc::new(RwLock::new(QuestionPoolStore::new(100, 1800)));
        let attempts = Arc::new(RwLock::new(UserAttemptTracker::new()));

        let pool_handle = spawn_pool_sweep_task(pools, 600);
        let history_handle = spawn_history_sweep_task(attempts, 3600, 0);

        pool_handle.abort();
        history_handle.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(pool_handle.is_finished());
        assert!(history_handle.is_finished());
    }
}
