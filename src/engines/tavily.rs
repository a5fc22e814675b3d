//! Tavily Search API adapter
//!
//! POST JSON API with bearer auth. Tavily can return a synthesized `answer`
//! alongside the ranked `results`; when present the answer leads the summary
//! and the numbered references follow it.

use super::traits::SearchEngine;
use crate::error::DeepSearchError;
use crate::search::{Reference, SearchResult, NO_RESULTS_MESSAGE};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

/// Default Tavily search endpoint
pub const TAVILY_SEARCH_ENDPOINT: &str = "https://api.tavily.com/search";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_MAX_RESULTS: u32 = 10;

/// Tavily search engine adapter
#[derive(Debug)]
pub struct TavilyEngine {
    api_key: String,
    endpoint: String,
    max_results: u32,
    timeout: Duration,
    client: reqwest::Client,
}

impl TavilyEngine {
    /// Create an adapter; an empty API key is rejected immediately
    pub fn new(api_key: &str) -> Result<Self, DeepSearchError> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(DeepSearchError::MissingCredential("TAVILY_API_KEY"));
        }

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|err| DeepSearchError::InvalidConfiguration(err.to_string()))?;

        Ok(Self {
            api_key: api_key.to_string(),
            endpoint: TAVILY_SEARCH_ENDPOINT.to_string(),
            max_results: DEFAULT_MAX_RESULTS,
            timeout: DEFAULT_TIMEOUT,
            client,
        })
    }

    /// Override the service endpoint (tests, proxies)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = max_results;
        self
    }

    /// Normalize a Tavily payload into one [`SearchResult`]
    fn parse_response(payload: serde_json::Value, query: &str) -> SearchResult {
        let response: TavilyResponse = serde_json::from_value(payload).unwrap_or_default();

        let mut summary = String::new();
        if let Some(answer) = response.answer.as_deref() {
            let answer = answer.trim();
            if !answer.is_empty() {
                summary.push_str(answer);
                summary.push_str("\n\n");
            }
        }

        let mut references = Vec::new();
        for (i, item) in response.results.iter().enumerate() {
            summary.push_str(&format!(
                "Reference {}:\nTitle: {}\nContent: {}\n\n",
                i + 1,
                item.title,
                item.content
            ));
            references.push(
                Reference::new()
                    .with_title(item.title.clone())
                    .with_url(item.url.clone())
                    .with_content(item.content.clone()),
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

#[async_trait]
impl SearchEngine for TavilyEngine {
    fn name(&self) -> &str {
        "tavily"
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn search_single(&self, query: &str) -> anyhow::Result<SearchResult> {
        let body = json!({
            "query": query,
            "max_results": self.max_results,
            "include_answer": true,
        });

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        let payload: serde_json::Value = response.json().await?;
        Ok(Self::parse_response(payload, query))
    }
}

#[derive(Debug, Default, Deserialize)]
struct TavilyResponse {
    answer: Option<String>,
    #[serde(default)]
    results: Vec<TavilyItem>,
}

#[derive(Debug, Default, Deserialize)]
struct TavilyItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_empty_api_key_rejected() {
        assert!(matches!(
            TavilyEngine::new(""),
            Err(DeepSearchError::MissingCredential("TAVILY_API_KEY"))
        ));
    }

    #[test]
    fn test_parse_answer_leads_summary() {
        let payload = json!({
            "answer": "Rust is a systems language.",
            "results": [
                { "title": "rust-lang.org", "url": "https://rust-lang.org", "content": "Official site" }
            ]
        });

        let result = TavilyEngine::parse_response(payload, "what is rust");
        assert!(result
            .summary_content
            .starts_with("Rust is a systems language."));
        assert!(result.summary_content.contains("Reference 1:"));
        assert_eq!(result.reference_count(), 1);
    }

    #[test]
    fn test_parse_zero_matches_yields_fixed_message() {
        let result = TavilyEngine::parse_response(json!({"results": []}), "q");
        assert_eq!(result.summary_content, NO_RESULTS_MESSAGE);
        assert!(result.references.is_none());
    }

    #[tokio::test]
    async fn test_wire_shape_bearer_post() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/search"))
            .and(header("Authorization", "Bearer tv-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "answer": "A.",
                "results": [{ "title": "T", "url": "u", "content": "c" }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let engine = TavilyEngine::new("tv-key")
            .unwrap()
            .with_endpoint(format!("{}/search", server.uri()));
        let result = engine.search_single("q").await.unwrap();
        assert_eq!(result.reference_count(), 1);
    }
}
