//! Subset Selection Module
//!
//! Seeded random extraction of request-sized question subsets from larger
//! pools. Not cryptographically secure, and not meant to be.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::cache::current_timestamp_ms;
use crate::models::Question;

// == Subset Selector ==
/// Draws random subsets with an injectable seed.
///
/// By default each call seeds from the wall clock combined with the input
/// size; constructed with a fixed base seed the selection becomes fully
/// deterministic, which is what tests use.
#[derive(Debug, Clone, Default)]
pub struct SubsetSelector {
    base_seed: Option<u64>,
}

impl SubsetSelector {
    /// Creates a selector seeded from the wall clock on every call.
    pub fn new() -> Self {
        Self { base_seed: None }
    }

    /// Creates a deterministic selector with a fixed base seed.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            base_seed: Some(seed),
        }
    }

    fn rng(&self, index: u64) -> StdRng {
        let base = self.base_seed.unwrap_or_else(current_timestamp_ms);
        StdRng::seed_from_u64(base ^ index.wrapping_mul(0x9e37_79b9_7f4a_7c15))
    }

    // == Select ==
    /// Returns `min(count, pool.len())` questions drawn from `pool`.
    ///
    /// A pool no larger than `count` is returned as a full copy. Otherwise
    /// a partial Fisher-Yates pass picks exactly `count` elements. Output
    /// uniqueness follows from the pool being deduplicated.
    pub fn select(&self, pool: &[Question], count: usize) -> Vec<Question> {
        if pool.len() <= count {
            return pool.to_vec();
        }

        let mut drawn = pool.to_vec();
        let mut rng = self.rng(pool.len() as u64);
        for i in 0..count {
            let j = rng.gen_range(i..drawn.len());
            drawn.swap(i, j);
        }
        drawn.truncate(count);
        drawn
    }

    // == Shuffle ==
    /// Shuffles a question list in place with the same seeding scheme.
    pub fn shuffle(&self, questions: &mut [Question]) {
        let mut rng = self.rng(questions.len() as u64);
        questions.shuffle(&mut rng);
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn pool(n: usize) -> Vec<Question> {
        (0..n).map(|i| Question::new(format!("q-{i}"))).collect()
    }

    fn ids(questions: &[Question]) -> HashSet<String> {
        questions.iter().map(|q| q.id.clone()).collect()
    }

    #[test]
    fn test_select_small_pool_returns_full_copy() {
        let selector = SubsetSelector::new();
        let pool = pool(5);

        let subset = selector.select(&pool, 10);

        assert_eq!(subset.len(), 5);
        assert_eq!(ids(&subset), ids(&pool));
    }

    #[test]
    fn test_select_exact_size_returns_full_copy() {
        let selector = SubsetSelector::new();
        let pool = pool(10);

        let subset = selector.select(&pool, 10);
        assert_eq!(ids(&subset), ids(&pool));
    }

    #[test]
    fn test_select_returns_exactly_count_unique_items() {
        let selector = SubsetSelector::new();
        let pool = pool(30);

        let subset = selector.select(&pool, 10);

        assert_eq!(subset.len(), 10);
        let subset_ids = ids(&subset);
        assert_eq!(subset_ids.len(), 10, "no duplicate identities");
        assert!(subset_ids.is_subset(&ids(&pool)));
    }

    #[test]
    fn test_select_empty_pool() {
        let selector = SubsetSelector::new();
        assert!(selector.select(&[], 10).is_empty());
    }

    #[test]
    fn test_seeded_selection_is_deterministic() {
        let pool = pool(30);

        let a = SubsetSelector::with_seed(42).select(&pool, 10);
        let b = SubsetSelector::with_seed(42).select(&pool, 10);
        assert_eq!(a, b);

        let c = SubsetSelector::with_seed(43).select(&pool, 10);
        assert_ne!(a, c, "different seeds should disagree on a 30-choose-10 draw");
    }

    #[test]
    fn test_seeded_shuffle_is_deterministic() {
        let mut a = pool(20);
        let mut b = pool(20);

        SubsetSelector::with_seed(7).shuffle(&mut a);
        SubsetSelector::with_seed(7).shuffle(&mut b);

        assert_eq!(a, b);
        assert_eq!(ids(&a).len(), 20, "shuffle must not lose elements");
    }
}
