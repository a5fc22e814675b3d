//! Search result type definitions
//!
//! Canonical shapes produced by every search backend and consumed by the
//! research orchestrator.

use serde::{Deserialize, Serialize};

/// Message used when a provider returns no usable matches for a query
pub const NO_RESULTS_MESSAGE: &str = "No results found.";

/// A single citable source extracted from a provider response
///
/// Every field is a best-effort extraction; absent fields are omitted from
/// serialized output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    /// Site or publisher name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site: Option<String>,
    /// Source URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Page or article title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Snippet or summary text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl Reference {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_site(mut self, site: impl Into<String>) -> Self {
        self.site = Some(site.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }
}

/// The outcome of one query against one search backend
///
/// Invariants: `summary_content` is never empty (a provider returning
/// nothing yields [`NO_RESULTS_MESSAGE`], a failed call yields a failure
/// message), and `references` is either `None` or non-empty. An empty vec
/// is never represented, so "no data extracted" stays distinguishable from
/// "not attempted".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// The query this result answers
    pub query: String,
    /// Human-readable digest of what was found
    pub summary_content: String,
    /// Citable sources, in provider order
    #[serde(skip_serializing_if = "Option::is_none")]
    pub references: Option<Vec<Reference>>,
}

impl SearchResult {
    /// Create a result with no references
    pub fn new(query: impl Into<String>, summary_content: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            summary_content: summary_content.into(),
            references: None,
        }
    }

    /// Attach references; an empty vec collapses to `None`
    pub fn with_references(mut self, references: Vec<Reference>) -> Self {
        self.references = if references.is_empty() {
            None
        } else {
            Some(references)
        };
        self
    }

    /// Failure-substitute result for a query whose backend call failed
    pub fn failure(query: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self {
            query: query.into(),
            summary_content: format!("Search failed: {}", reason),
            references: None,
        }
    }

    /// Whether this result carries the failure-substitute marker
    pub fn is_failure(&self) -> bool {
        self.summary_content.starts_with("Search failed:")
    }

    pub fn reference_count(&self) -> usize {
        self.references.as_ref().map_or(0, Vec::len)
    }
}
