//! DeepSearch-RS: a multi-round deep research agent written in Rust
//!
//! Given a question, the agent asks a planning model for a batch of search
//! queries and fans them out concurrently to a pluggable web-search backend.
//! It keeps gathering references until the planner deems the evidence
//! sufficient (or the round budget runs out), then synthesizes a citable
//! answer, returned whole or streamed incrementally.

pub mod config;
pub mod engines;
pub mod error;
pub mod model;
pub mod research;
pub mod search;
pub mod web;

pub use config::Settings;
pub use engines::SearchEngine;
pub use error::DeepSearchError;
pub use model::{ChatMessage, ChatModel};
pub use research::{DeepResearch, ResearchConfig, ResearchEvent};
pub use search::{Reference, SearchExecutor, SearchResult};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
