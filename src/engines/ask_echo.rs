//! AskEcho Search Agent adapter
//!
//! Agent-chat style API: one POST per query with a chat-completion shaped
//! payload, bearer-token auth. The reply carries the agent's summary in
//! `choices[0].message.content` and an optional `references` array.
//!
//! API reference: https://docs.byteplus.com/en/docs/askecho/Agent_API_Reference

use super::traits::SearchEngine;
use crate::error::DeepSearchError;
use crate::search::{Reference, SearchResult, NO_RESULTS_MESSAGE};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

/// Default AskEcho agent chat endpoint
pub const ASK_ECHO_CHAT_ENDPOINT: &str =
    "https://torchlight.byteintlapi.com/agent_api/agent/chat/completion";

/// Path appended to a base-URL override
const CHAT_PATH: &str = "/agent_api/agent/chat/completion";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// AskEcho search engine adapter
#[derive(Debug)]
pub struct AskEchoEngine {
    api_key: String,
    agent_id: String,
    chat_url: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl AskEchoEngine {
    /// Create an adapter; empty API key or agent id is rejected immediately
    ///
    /// `base_url`, when given, replaces the service root and the fixed chat
    /// path is appended to it; otherwise the default endpoint is used.
    pub fn new(
        api_key: &str,
        agent_id: &str,
        base_url: Option<&str>,
    ) -> Result<Self, DeepSearchError> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(DeepSearchError::MissingCredential("ASK_ECHO_API_KEY"));
        }
        let agent_id = agent_id.trim();
        if agent_id.is_empty() {
            return Err(DeepSearchError::MissingCredential("ASK_ECHO_AGENT_ID"));
        }

        let chat_url = match base_url.map(|b| b.trim().trim_end_matches('/')) {
            Some(base) if !base.is_empty() => {
                url::Url::parse(base).map_err(|err| {
                    DeepSearchError::InvalidConfiguration(format!(
                        "invalid AskEcho base URL {:?}: {}",
                        base, err
                    ))
                })?;
                format!("{}{}", base, CHAT_PATH)
            }
            _ => ASK_ECHO_CHAT_ENDPOINT.to_string(),
        };

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|err| DeepSearchError::InvalidConfiguration(err.to_string()))?;

        Ok(Self {
            api_key: api_key.to_string(),
            agent_id: agent_id.to_string(),
            chat_url,
            timeout: DEFAULT_TIMEOUT,
            client,
        })
    }

    /// Endpoint the adapter will call
    pub fn chat_url(&self) -> &str {
        &self.chat_url
    }

    /// Normalize an agent-chat payload into one [`SearchResult`]
    fn parse_response(payload: serde_json::Value, query: &str) -> SearchResult {
        let response: AskEchoResponse = serde_json::from_value(payload).unwrap_or_default();

        let content = response
            .choices
            .first()
            .map(|choice| choice.message.content.trim().to_string())
            .unwrap_or_default();

        let references: Vec<Reference> = response
            .references
            .into_iter()
            .map(|r| {
                let mut reference = Reference::new();
                if let Some(site) = r.site_name {
                    reference = reference.with_site(site);
                }
                if let Some(url) = r.url {
                    reference = reference.with_url(url);
                }
                if let Some(title) = r.title {
                    reference = reference.with_title(title);
                }
                if let Some(summary) = r.summary {
                    reference = reference.with_content(summary);
                }
                reference
            })
            .collect();

        let summary = if content.is_empty() {
            NO_RESULTS_MESSAGE.to_string()
        } else {
            content
        };

        SearchResult::new(query, summary).with_references(references)
    }
}

#[async_trait]
impl SearchEngine for AskEchoEngine {
    fn name(&self) -> &str {
        "ask_echo"
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn search_single(&self, query: &str) -> anyhow::Result<SearchResult> {
        let body = json!({
            "bot_id": self.agent_id,
            "messages": [{ "role": "user", "content": query }],
            "stream": false,
        });

        let response = self
            .client
            .post(&self.chat_url)
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
struct AskEchoResponse {
    #[serde(default)]
    choices: Vec<AskEchoChoice>,
    #[serde(default)]
    references: Vec<AskEchoReference>,
}

#[derive(Debug, Default, Deserialize)]
struct AskEchoChoice {
    #[serde(default)]
    message: AskEchoMessage,
}

#[derive(Debug, Default, Deserialize)]
struct AskEchoMessage {
    #[serde(default)]
    content: String,
}

#[derive(Debug, Default, Deserialize)]
struct AskEchoReference {
    site_name: Option<String>,
    url: Option<String>,
    summary: Option<String>,
    title: Option<String>,
}
