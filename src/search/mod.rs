//! Search types and batch execution
//!
//! The result shapes every backend produces, plus the executor that fans a
//! query batch out across one adapter with per-query fault isolation.

mod executor;
mod types;

pub use executor::SearchExecutor;
pub use types::{Reference, SearchResult, NO_RESULTS_MESSAGE};
