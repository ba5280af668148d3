//! Exam Cache Service
//!
//! Orchestrates key generation, attempt tracking, pool construction and
//! subset selection behind a single acquire operation. One instance is
//! built at the application's composition root and shared from there; the
//! crate deliberately exposes no global singleton.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::attempts::UserAttemptTracker;
use crate::config::PoolCacheConfig;
use crate::error::{PoolCacheError, Result};
use crate::models::{
    AcquiredQuestions, CacheInfo, CacheInfoKind, CacheServiceStats, ExamQuestionConfig, Question,
    UserAttemptStats,
};
use crate::pool::{pool_key, BuiltPool, PoolBuilder, QuestionPoolStore, SubsetSelector};
use crate::source::{QuestionQuery, QuestionSource};

const MOST_USED_LIMIT: usize = 5;

// == Exam Cache Service ==
/// The question-pool cache engine.
///
/// Pool store and attempt tracker live behind `RwLock`s; no lock is ever
/// held across the backing-source await, so two concurrent misses for the
/// same key may both build a pool. The later insert wins — an accepted
/// race whose cost is one redundant query, never corrupted state.
pub struct ExamCacheService {
    pools: Arc<RwLock<QuestionPoolStore>>,
    attempts: Arc<RwLock<UserAttemptTracker>>,
    source: Arc<dyn QuestionSource>,
    builder: PoolBuilder,
    selector: SubsetSelector,
    config: PoolCacheConfig,
}

impl ExamCacheService {
    // == Constructor ==
    /// Creates a service over the given question source.
    pub fn new(source: Arc<dyn QuestionSource>, config: PoolCacheConfig) -> Self {
        Self::with_selector(source, config, SubsetSelector::new())
    }

    /// Creates a service whose subset selection is fully deterministic.
    /// Meant for tests that need reproducible draws.
    pub fn with_seed(source: Arc<dyn QuestionSource>, config: PoolCacheConfig, seed: u64) -> Self {
        Self::with_selector(source, config, SubsetSelector::with_seed(seed))
    }

    fn with_selector(
        source: Arc<dyn QuestionSource>,
        config: PoolCacheConfig,
        selector: SubsetSelector,
    ) -> Self {
        Self {
            pools: Arc::new(RwLock::new(QuestionPoolStore::new(
                config.max_pools,
                config.cache_ttl_secs,
            ))),
            attempts: Arc::new(RwLock::new(UserAttemptTracker::new())),
            builder: PoolBuilder::new(config.pool_size_multiplier, config.query_hard_limit),
            source,
            selector,
            config,
        }
    }

    /// Shared handle to the pool store, for wiring up the expiry sweep.
    pub fn pool_store(&self) -> Arc<RwLock<QuestionPoolStore>> {
        Arc::clone(&self.pools)
    }

    /// Shared handle to the attempt tracker, for wiring up the idle sweep.
    pub fn attempt_tracker(&self) -> Arc<RwLock<UserAttemptTracker>> {
        Arc::clone(&self.attempts)
    }

    /// The configuration this service was built with.
    pub fn config(&self) -> &PoolCacheConfig {
        &self.config
    }

    // == Acquire Questions ==
    /// Serves a randomized question set for `config`.
    ///
    /// With user context the acquisition is attempt-tracked and
    /// anti-repetition filtered; without it the legacy path serves plain
    /// shared pools. A short or empty result means the bank is exhausted
    /// and is not an error.
    pub async fn acquire_questions(&self, config: ExamQuestionConfig) -> Result<AcquiredQuestions> {
        match config.user_context() {
            Some(_) => self.acquire_tracked(config).await,
            None => self.acquire_legacy(config).await,
        }
    }

    async fn acquire_tracked(&self, config: ExamQuestionConfig) -> Result<AcquiredQuestions> {
        let (user_id, exam_id) = match config.user_context() {
            Some((user, exam)) => (user.to_string(), exam.to_string()),
            None => unreachable!("tracked path requires user context"),
        };

        // Attempt check happens before anything is mutated.
        let (attempt_number, used_ids) = {
            let mut attempts = self.attempts.write().await;
            let attempt_number =
                attempts.next_attempt(&user_id, &exam_id, self.config.max_attempts)?;
            let used_ids = attempts.used_question_ids(&user_id, &exam_id);
            (attempt_number, used_ids)
        };
        let attempt_count = attempt_number - 1;

        let mut keyed = config;
        keyed.attempt_number = Some(attempt_number);
        let key = pool_key(&keyed);

        // Hit: pools are shared across users at the same attempt number.
        let cached = {
            let mut pools = self.pools.write().await;
            let snapshot = pools
                .get(&key)
                .map(|entry| (entry.value.questions.clone(), entry.value.version));
            snapshot.map(|(questions, version)| {
                pools.touch(&key);
                (questions, version, pools.hit_rate())
            })
        };

        if let Some((questions, version, hit_rate)) = cached {
            let served = self.selector.select(&questions, keyed.total_questions);
            self.attempts.write().await.record_attempt(
                &user_id,
                &exam_id,
                attempt_number,
                version,
                &served,
            );

            debug!(%key, attempt_number, served = served.len(), "served from shared pool");
            return Ok(AcquiredQuestions {
                questions: served,
                cache_info: CacheInfo {
                    kind: CacheInfoKind::Shared,
                    hit_rate,
                    version,
                },
            });
        }

        // Miss: build outside any lock, then insert (later build wins).
        let built = self
            .builder
            .build(
                self.source.as_ref(),
                &keyed,
                attempt_count,
                &used_ids,
                &self.selector,
            )
            .await?;

        let (served, kind) = self.serve_novelty_first(&built, keyed.total_questions);

        let hit_rate = {
            let mut pools = self.pools.write().await;
            pools.put(
                key.clone(),
                built.questions,
                keyed.clone(),
                attempt_number,
            );
            pools.hit_rate()
        };

        self.attempts.write().await.record_attempt(
            &user_id,
            &exam_id,
            attempt_number,
            attempt_number,
            &served,
        );

        info!(
            %key,
            attempt_number,
            served = served.len(),
            kind = ?kind,
            "built and cached question pool"
        );
        Ok(AcquiredQuestions {
            questions: served,
            cache_info: CacheInfo {
                kind,
                hit_rate,
                version: attempt_number,
            },
        })
    }

    /// Serves from a freshly built pool, draining the fresh segment before
    /// touching backfill so repetition is the pigeonhole minimum.
    fn serve_novelty_first(
        &self,
        built: &BuiltPool,
        total_questions: usize,
    ) -> (Vec<Question>, CacheInfoKind) {
        let fresh = &built.questions[..built.fresh_count];
        let mut served = self.selector.select(fresh, total_questions);

        let deficit = total_questions.saturating_sub(served.len());
        if deficit == 0 || !built.has_backfill() {
            return (served, CacheInfoKind::Unique);
        }

        served.extend(
            built.questions[built.fresh_count..]
                .iter()
                .take(deficit)
                .cloned(),
        );
        (served, CacheInfoKind::Repetition)
    }

    // == Legacy Path ==
    /// Attempt-less acquisition for callers without user context: a
    /// version-less key, a plain multiplier-sized pool, no filtering.
    async fn acquire_legacy(&self, config: ExamQuestionConfig) -> Result<AcquiredQuestions> {
        let key = pool_key(&config);

        let cached = {
            let mut pools = self.pools.write().await;
            let snapshot = pools
                .get(&key)
                .map(|entry| (entry.value.questions.clone(), entry.value.version));
            snapshot.map(|(questions, version)| {
                pools.touch(&key);
                (questions, version, pools.hit_rate())
            })
        };

        if let Some((questions, version, hit_rate)) = cached {
            let served = self.selector.select(&questions, config.total_questions);
            debug!(%key, served = served.len(), "served from legacy pool");
            return Ok(AcquiredQuestions {
                questions: served,
                cache_info: CacheInfo {
                    kind: CacheInfoKind::Shared,
                    hit_rate,
                    version,
                },
            });
        }

        let query = QuestionQuery {
            difficulty: config.difficulty,
            categories: config.categories.clone(),
            tags: config.tags.clone(),
            limit: self.builder.legacy_fetch_limit(config.total_questions),
            newest_first: true,
        };
        let candidates = self
            .source
            .query(&query)
            .await
            .map_err(PoolCacheError::SourceQueryFailed)?;

        let mut seen = HashSet::with_capacity(candidates.len());
        let mut questions: Vec<Question> = candidates
            .into_iter()
            .filter(|q| seen.insert(q.id.clone()))
            .collect();
        self.selector.shuffle(&mut questions);

        let served = self.selector.select(&questions, config.total_questions);
        let hit_rate = {
            let mut pools = self.pools.write().await;
            pools.put(key.clone(), questions, config.clone(), 0);
            pools.hit_rate()
        };

        info!(%key, served = served.len(), "built and cached legacy pool");
        Ok(AcquiredQuestions {
            questions: served,
            cache_info: CacheInfo {
                kind: CacheInfoKind::Unique,
                hit_rate,
                version: 0,
            },
        })
    }

    // == Stats ==
    /// Operational snapshot across the pool store and attempt tracker.
    pub async fn get_stats(&self) -> CacheServiceStats {
        let pools = self.pools.read().await;
        let attempts = self.attempts.read().await;

        CacheServiceStats {
            total_pools: pools.len(),
            hit_rate: pools.hit_rate(),
            memory_usage_estimate_bytes: pools.memory_estimate_bytes(),
            most_used_pools: pools.most_used(MOST_USED_LIMIT),
            attempt_stats: attempts.stats(),
        }
    }

    /// Attempt statistics for one (user, exam), if any.
    pub async fn get_user_attempt_stats(
        &self,
        user_id: &str,
        exam_id: &str,
    ) -> Option<UserAttemptStats> {
        self.attempts
            .read()
            .await
            .user_stats(user_id, exam_id, self.config.max_attempts)
    }

    // == Clear ==
    /// Drops every cached pool. Attempt histories are untouched.
    pub async fn clear_all(&self) {
        self.pools.write().await.clear_all();
        info!("cleared all cached pools");
    }

    /// Drops every pool built for `category`, returning the number removed.
    pub async fn clear_by_category(&self, category: &str) -> usize {
        let removed = self.pools.write().await.clear_by_category(category);
        info!(category, removed, "cleared pools by category");
        removed
    }
}
