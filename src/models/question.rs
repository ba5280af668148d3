//! Question and exam configuration models
//!
//! Defines the opaque question record and the configuration that drives
//! pool construction and cache addressing.

use serde::{Deserialize, Serialize};

// == Difficulty ==
/// Exam difficulty level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Stable lowercase name, used as the first pool key segment.
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

// == Question ==
/// An opaque question record from the backing source.
///
/// The cache only ever inspects `id`; everything else rides along in
/// `body` untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Identity used for deduplication and anti-repetition
    pub id: String,
    /// Opaque question content, passed through as-is
    #[serde(default)]
    pub body: serde_json::Value,
}

impl Question {
    /// Creates a question with an empty body, mostly useful in tests.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            body: serde_json::Value::Null,
        }
    }
}

// == Exam Question Config ==
/// Configuration for one question acquisition.
///
/// `categories` and `tags` are sets: their order never affects cache
/// addressing. `attempt_number` is assigned internally by the service and
/// must not be set by callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamQuestionConfig {
    pub difficulty: Difficulty,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub total_questions: usize,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub exam_id: Option<String>,
    #[serde(skip)]
    pub attempt_number: Option<u32>,
}

impl ExamQuestionConfig {
    /// Creates a config without user context (legacy, attempt-less path).
    pub fn new(difficulty: Difficulty, total_questions: usize) -> Self {
        Self {
            difficulty,
            categories: Vec::new(),
            tags: Vec::new(),
            total_questions,
            user_id: None,
            exam_id: None,
            attempt_number: None,
        }
    }

    /// Returns (user_id, exam_id) when both are present, enabling the
    /// attempt-tracked path.
    pub fn user_context(&self) -> Option<(&str, &str)> {
        match (self.user_id.as_deref(), self.exam_id.as_deref()) {
            (Some(user), Some(exam)) => Some((user, exam)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_serializes_lowercase() {
        let json = serde_json::to_string(&Difficulty::Medium).unwrap();
        assert_eq!(json, "\"medium\"");
    }

    #[test]
    fn test_question_body_defaults_to_null() {
        let q: Question = serde_json::from_str(r#"{"id":"q-1"}"#).unwrap();
        assert_eq!(q.id, "q-1");
        assert!(q.body.is_null());
    }

    #[test]
    fn test_config_user_context_requires_both_ids() {
        let mut config = ExamQuestionConfig::new(Difficulty::Easy, 10);
        assert!(config.user_context().is_none());

        config.user_id = Some("u1".to_string());
        assert!(config.user_context().is_none());

        config.exam_id = Some("e1".to_string());
        assert_eq!(config.user_context(), Some(("u1", "e1")));
    }

    #[test]
    fn test_config_deserialize_ignores_attempt_number() {
        let config: ExamQuestionConfig = serde_json::from_str(
            r#"{"difficulty":"easy","categories":["math"],"total_questions":10}"#,
        )
        .unwrap();
        assert_eq!(config.total_questions, 10);
        assert!(config.attempt_number.is_none());
    }
}
