//! Attempts Module
//!
//! Tracks how often each user has taken each exam and which questions
//! they have already seen.

mod tracker;

pub use tracker::{UserAttemptHistory, UserAttemptTracker};
