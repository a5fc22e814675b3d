//! Search engine adapters
//!
//! Defines the SearchEngine trait and one adapter per supported provider,
//! each hiding provider-specific auth, request shape, and response parsing.

mod loader;
mod traits;

// Adapter implementations
pub mod ask_echo;
pub mod tavily;
pub mod you;

pub use loader::{build_engine, resolve_alias};
pub use traits::SearchEngine;
