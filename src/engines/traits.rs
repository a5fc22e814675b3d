//! The search engine contract every backend adapter implements

use crate::search::SearchResult;
use async_trait::async_trait;
use std::time::Duration;

/// One search provider behind a uniform capability
///
/// An adapter owns everything provider-specific: auth shape, request
/// building, and response normalization into [`SearchResult`]. Instances are
/// reused across the queries of a batch and hold no per-query mutable state;
/// each call is self-contained.
///
/// `search_single` may fail; the batch executor converts failures into
/// failure-substitute results so that one query never sinks its siblings.
#[async_trait]
pub trait SearchEngine: std::fmt::Debug + Send + Sync {
    /// Canonical provider identifier (e.g. "you", "ask_echo")
    fn name(&self) -> &str;

    /// Upper bound for one provider request; enforced by the executor on
    /// top of the adapter's own HTTP client timeout
    fn timeout(&self) -> Duration;

    /// Execute one query against the provider and normalize the response
    async fn search_single(&self, query: &str) -> anyhow::Result<SearchResult>;
}
