//! You.com Search API adapter
//!
//! Key-based GET API: `query`, `count`, `freshness`, `safesearch` query
//! parameters with the API key in an `X-API-Key` header. Web and news hits
//! come back as disjoint categories and are concatenated web-first into one
//! reference sequence with continued numbering.

use super::traits::SearchEngine;
use crate::error::DeepSearchError;
use crate::search::{Reference, SearchResult, NO_RESULTS_MESSAGE};
use async_trait::async_trait;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

/// Default You.com search endpoint
pub const YOU_SEARCH_ENDPOINT: &str = "https://ydc-index.io/v1/search";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_COUNT: u32 = 10;

/// Result freshness window
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Freshness {
    Day,
    #[default]
    Week,
    Month,
    Year,
}

impl Freshness {
    pub fn as_str(&self) -> &'static str {
        match self {
            Freshness::Day => "day",
            Freshness::Week => "week",
            Freshness::Month => "month",
            Freshness::Year => "year",
        }
    }
}

impl fmt::Display for Freshness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Safe search filtering level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SafeSearch {
    Off,
    #[default]
    Moderate,
    Strict,
}

impl SafeSearch {
    pub fn as_str(&self) -> &'static str {
        match self {
            SafeSearch::Off => "off",
            SafeSearch::Moderate => "moderate",
            SafeSearch::Strict => "strict",
        }
    }
}

impl fmt::Display for SafeSearch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// You.com search engine adapter
#[derive(Debug)]
pub struct YouEngine {
    api_key: String,
    endpoint: String,
    count: u32,
    freshness: Freshness,
    safesearch: SafeSearch,
    timeout: Duration,
    client: reqwest::Client,
}

impl YouEngine {
    /// Create an adapter; an empty API key is rejected immediately
    pub fn new(api_key: &str) -> Result<Self, DeepSearchError> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(DeepSearchError::MissingCredential("YOU_API_KEY"));
        }

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|err| DeepSearchError::InvalidConfiguration(err.to_string()))?;

        Ok(Self {
            api_key: api_key.to_string(),
            endpoint: YOU_SEARCH_ENDPOINT.to_string(),
            count: DEFAULT_COUNT,
            freshness: Freshness::default(),
            safesearch: SafeSearch::default(),
            timeout: DEFAULT_TIMEOUT,
            client,
        })
    }

    /// Override the service endpoint (tests, proxies)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    pub fn with_freshness(mut self, freshness: Freshness) -> Self {
        self.freshness = freshness;
        self
    }

    pub fn with_safesearch(mut self, safesearch: SafeSearch) -> Self {
        self.safesearch = safesearch;
        self
    }

    /// Normalize a provider payload into one [`SearchResult`]
    ///
    /// Unexpected shapes parse to default-valued structs, so a surprising
    /// payload degrades to the no-results message instead of failing.
    fn parse_response(payload: serde_json::Value, query: &str) -> SearchResult {
        let response: YouResponse = serde_json::from_value(payload).unwrap_or_default();

        let mut summary = String::new();
        let mut references = Vec::new();

        for (i, item) in response.results.web.iter().enumerate() {
            let snippet = item.snippets.join(" ");
            let content = if snippet.trim().is_empty() {
                item.description.clone()
            } else {
                snippet.trim().to_string()
            };
            push_entry(&mut summary, i + 1, &item.title, &content);
            references.push(
                Reference::new()
                    .with_title(item.title.clone())
                    .with_url(item.url.clone())
                    .with_content(content),
            );
        }

        let offset = response.results.web.len();
        for (j, item) in response.results.news.iter().enumerate() {
            push_entry(&mut summary, offset + j + 1, &item.title, &item.description);
            references.push(
                Reference::new()
                    .with_title(item.title.clone())
                    .with_url(item.url.clone())
                    .with_content(item.description.clone()),
            );
        }

        let summary = summary.trim().to_string();
        let summary = if summary.is_empty() {
            NO_RESULTS_MESSAGE.to_string()
        } else {
            summary
        };

        SearchResult::new(query, summary).with_references(references)
    }
}

fn push_entry(summary: &mut String, index: usize, title: &str, content: &str) {
    summary.push_str(&format!(
        "Reference {}:\nTitle: {}\nContent: {}\n\n",
        index, title, content
    ));
}

#[async_trait]
impl SearchEngine for YouEngine {
    fn name(&self) -> &str {
        "you"
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn search_single(&self, query: &str) -> anyhow::Result<SearchResult> {
        let count = self.count.to_string();
        let response = self
            .client
            .get(&self.endpoint)
            .header("X-API-Key", &self.api_key)
            .query(&[
                ("query", query),
                ("count", count.as_str()),
                ("freshness", self.freshness.as_str()),
                ("safesearch", self.safesearch.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let payload: serde_json::Value = response.json().await?;
        Ok(Self::parse_response(payload, query))
    }
}

#[derive(Debug, Default, Deserialize)]
struct YouResponse {
    #[serde(default)]
    results: YouResults,
}

#[derive(Debug, Default, Deserialize)]
struct YouResults {
    #[serde(default)]
    web: Vec<YouItem>,
    #[serde(default)]
    news: Vec<YouItem>,
}

#[derive(Debug, Default, Deserialize)]
struct YouItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    snippets: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::SearchExecutor;
    use serde_json::json;
    use std::sync::Arc;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_empty_api_key_rejected() {
        assert!(matches!(
            YouEngine::new("  "),
            Err(DeepSearchError::MissingCredential("YOU_API_KEY"))
        ));
    }

    #[test]
    fn test_parse_web_and_news_concatenated() {
        let payload = json!({
            "results": {
                "web": [
                    {
                        "title": "Rust Book",
                        "description": "fallback",
                        "snippets": ["The Rust language", "is memory safe"],
                        "url": "https://doc.rust-lang.org/book"
                    }
                ],
                "news": [
                    {
                        "title": "Rust 1.80 released",
                        "description": "New release",
                        "url": "https://blog.rust-lang.org"
                    }
                ]
            }
        });

        let result = YouEngine::parse_response(payload, "rust");
        assert_eq!(result.query, "rust");
        assert_eq!(result.reference_count(), 2);

        let refs = result.references.as_ref().unwrap();
        // Web category first, then news, with continued numbering
        assert_eq!(refs[0].title.as_deref(), Some("Rust Book"));
        assert_eq!(
            refs[0].content.as_deref(),
            Some("The Rust language is memory safe")
        );
        assert_eq!(refs[1].title.as_deref(), Some("Rust 1.80 released"));
        assert!(result.summary_content.contains("Reference 1:"));
        assert!(result.summary_content.contains("Reference 2:"));
        assert!(result
            .summary_content
            .find("Rust Book")
            .unwrap()
            < result.summary_content.find("Rust 1.80 released").unwrap());
    }

    #[test]
    fn test_parse_web_item_falls_back_to_description() {
        let payload = json!({
            "results": {
                "web": [{ "title": "T", "description": "desc only", "url": "u" }]
            }
        });
        let result = YouEngine::parse_response(payload, "q");
        let refs = result.references.as_ref().unwrap();
        assert_eq!(refs[0].content.as_deref(), Some("desc only"));
    }

    #[test]
    fn test_parse_zero_matches_yields_fixed_message() {
        let result = YouEngine::parse_response(json!({"results": {}}), "obscure");
        assert_eq!(result.summary_content, NO_RESULTS_MESSAGE);
        assert!(result.references.is_none());
    }

    #[test]
    fn test_parse_unexpected_shape_degrades() {
        let result = YouEngine::parse_response(json!({"results": "oops"}), "q");
        assert_eq!(result.summary_content, NO_RESULTS_MESSAGE);
        assert!(result.references.is_none());
    }

    #[tokio::test]
    async fn test_wire_shape_and_auth_header() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .and(header("X-API-Key", "secret-key"))
            .and(query_param("query", "rust async"))
            .and(query_param("count", "10"))
            .and(query_param("freshness", "week"))
            .and(query_param("safesearch", "moderate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": {
                    "web": [{ "title": "Hit", "description": "d", "url": "u" }]
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let engine = YouEngine::new("secret-key")
            .unwrap()
            .with_endpoint(format!("{}/v1/search", server.uri()));
        let result = engine.search_single("rust async").await.unwrap();
        assert_eq!(result.reference_count(), 1);
    }

    #[tokio::test]
    async fn test_http_error_becomes_failure_substitute_in_batch() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let engine = YouEngine::new("k")
            .unwrap()
            .with_endpoint(format!("{}/v1/search", server.uri()));
        let executor = SearchExecutor::new(Arc::new(engine));
        let results = executor.search(&["q1".to_string()]).await;

        assert_eq!(results.len(), 1);
        assert!(results[0].is_failure());
        assert!(results[0].references.is_none());
    }
}
