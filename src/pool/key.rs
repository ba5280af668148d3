//! Pool Key Generation
//!
//! Builds the deterministic cache key a question pool is stored under.

use crate::models::ExamQuestionConfig;

// == Pool Key ==
/// Computes the cache key for a configuration:
/// `difficulty|categories|tags|total[|v{attempt}]`.
///
/// Categories and tags are sorted and deduplicated first, so the key is a
/// pure function of the configuration as a set. The `v{n}` suffix appears
/// only when an attempt number has been assigned; attempt-aware and legacy
/// keys can therefore never collide.
pub fn pool_key(config: &ExamQuestionConfig) -> String {
    let mut key = format!(
        "{}|{}|{}|{}",
        config.difficulty.as_str(),
        sorted_segment(&config.categories),
        sorted_segment(&config.tags),
        config.total_questions
    );

    if let Some(attempt) = config.attempt_number {
        key.push_str("|v");
        key.push_str(&attempt.to_string());
    }

    key
}

fn sorted_segment(values: &[String]) -> String {
    let mut values: Vec<&str> = values.iter().map(String::as_str).collect();
    values.sort_unstable();
    values.dedup();
    values.join(",")
}
