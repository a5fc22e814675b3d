//! Batch search execution across one backend adapter
//!
//! The executor is the façade the orchestrator talks to: an ordered batch
//! operation over a single [`SearchEngine`]. Queries fan out as independent
//! concurrent tasks and are joined before the batch returns; a failed or
//! timed-out query becomes a failure-substitute result at the join point and
//! never disturbs its siblings.

use crate::engines::SearchEngine;
use crate::search::SearchResult;
use futures::future::join_all;
use std::sync::Arc;
use std::time::Instant;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Ordered batch search over one backend adapter
#[derive(Clone)]
pub struct SearchExecutor {
    engine: Arc<dyn SearchEngine>,
}

impl SearchExecutor {
    pub fn new(engine: Arc<dyn SearchEngine>) -> Self {
        Self { engine }
    }

    /// Name of the backing provider
    pub fn engine_name(&self) -> &str {
        self.engine.name()
    }

    /// Execute every query concurrently, preserving input order
    ///
    /// Always returns exactly `queries.len()` results with
    /// `results[i].query == queries[i]`, regardless of individual failures.
    pub async fn search(&self, queries: &[String]) -> Vec<SearchResult> {
        let start = Instant::now();
        let deadline = self.engine.timeout();

        let futures: Vec<_> = queries
            .iter()
            .map(|query| {
                let engine = Arc::clone(&self.engine);
                async move { timeout(deadline, engine.search_single(query)).await }
            })
            .collect();

        info!(
            engine = self.engine.name(),
            queries = queries.len(),
            "Dispatching search batch"
        );

        // join_all resolves in input order, irrespective of completion order
        let outcomes = join_all(futures).await;

        let results: Vec<SearchResult> = queries
            .iter()
            .zip(outcomes)
            .map(|(query, outcome)| self.settle(query, outcome))
            .collect();

        debug!(
            engine = self.engine.name(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            failures = results.iter().filter(|r| r.is_failure()).count(),
            "Search batch complete"
        );

        results
    }

    /// Execute queries one at a time; output is identical to [`Self::search`]
    pub async fn search_sequential(&self, queries: &[String]) -> Vec<SearchResult> {
        let deadline = self.engine.timeout();
        let mut results = Vec::with_capacity(queries.len());
        for query in queries {
            let outcome = timeout(deadline, self.engine.search_single(query)).await;
            results.push(self.settle(query, outcome));
        }
        results
    }

    /// Convert one task outcome into a result, substituting failures
    fn settle(
        &self,
        query: &str,
        outcome: Result<anyhow::Result<SearchResult>, tokio::time::error::Elapsed>,
    ) -> SearchResult {
        match outcome {
            Ok(Ok(result)) => result,
            Ok(Err(err)) => {
                warn!(
                    engine = self.engine.name(),
                    query = query,
                    error = %err,
                    "Search query failed"
                );
                SearchResult::failure(query, err)
            }
            Err(_) => {
                warn!(
                    engine = self.engine.name(),
                    query = query,
                    timeout_ms = self.engine.timeout().as_millis() as u64,
                    "Search query timed out"
                );
                SearchResult::failure(
                    query,
                    format!("timed out after {}s", self.engine.timeout().as_secs()),
                )
            }
        }
    }
}
