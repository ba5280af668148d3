//! Pool Module
//!
//! Question-pool construction, addressing, storage and subset extraction.

mod builder;
mod key;
mod store;
mod subset;

// Re-export public types
pub use builder::{BuiltPool, PoolBuilder};
pub use key::pool_key;
pub use store::{QuestionPool, QuestionPoolStore};
pub use subset::SubsetSelector;
