//! HTTP request handlers
//!
//! The chat endpoint speaks the chat-completions protocol: the last user
//! message is the research question, and request `metadata` may override the
//! search provider and round/query limits for that one request.

use super::state::AppState;
use crate::config::Settings;
use crate::engines::build_engine;
use crate::error::DeepSearchError;
use crate::research::{DeepResearch, ResearchConfig};
use axum::{
    extract::State,
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    response::{IntoResponse, Response},
    Json,
};
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::convert::Infallible;
use std::sync::Arc;
use tracing::error;
use uuid::Uuid;

/// Incoming chat-completion request
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub model: Option<String>,
    pub messages: Vec<RequestMessage>,
    #[serde(default)]
    pub stream: bool,
    /// Per-request overrides: `search_engine`, `max_search_words`,
    /// `max_planning_rounds`
    #[serde(default)]
    pub metadata: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct RequestMessage {
    pub role: String,
    pub content: String,
}

/// Non-streaming chat-completion response
#[derive(Debug, Serialize)]
pub struct ChatCompletionResponse {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub model: String,
    pub choices: Vec<ResponseChoice>,
}

#[derive(Debug, Serialize)]
pub struct ResponseChoice {
    pub index: u32,
    pub message: ResponseMessage,
    pub finish_reason: String,
}

#[derive(Debug, Serialize)]
pub struct ResponseMessage {
    pub role: String,
    pub content: String,
}

/// Health check handler
pub async fn ping() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// Chat completions handler: runs one research session per request
pub async fn chat_completions(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Response {
    let Some(question) = last_user_message(&request.messages) else {
        return error_response(StatusCode::BAD_REQUEST, "request carries no user message");
    };

    let selected_engine = request.metadata.get("search_engine").and_then(|v| v.as_str());
    let engine = match build_engine(&state.settings.search, selected_engine) {
        Ok(engine) => engine,
        Err(err) => {
            error!(error = %err, "Failed to build search engine");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, &err.to_string());
        }
    };

    let config = research_config(&state.settings, &request.metadata);
    let model_name = config.synthesis_model.clone();
    let research = Arc::new(DeepResearch::new(state.model.clone(), engine, config));
    let completion_id = format!("cmpl-{}", Uuid::new_v4());

    if request.stream {
        let chunks = research.stream(question).map(move |item| {
            let data = match item {
                Ok(event) => {
                    let chunk = event.to_chunk(&completion_id, &model_name);
                    serde_json::to_string(&chunk)
                        .unwrap_or_else(|err| error_payload(&err.to_string()))
                }
                Err(err) => error_payload(&err.to_string()),
            };
            Ok::<Event, Infallible>(Event::default().data(data))
        });
        let done = futures::stream::once(async {
            Ok::<Event, Infallible>(Event::default().data("[DONE]"))
        });

        Sse::new(chunks.chain(done))
            .keep_alive(KeepAlive::default())
            .into_response()
    } else {
        match research.run(&question).await {
            Ok(answer) => Json(ChatCompletionResponse {
                id: completion_id,
                object: "chat.completion".to_string(),
                created: chrono::Utc::now().timestamp(),
                model: model_name,
                choices: vec![ResponseChoice {
                    index: 0,
                    message: ResponseMessage {
                        role: "assistant".to_string(),
                        content: answer,
                    },
                    finish_reason: "stop".to_string(),
                }],
            })
            .into_response(),
            Err(err) => {
                error!(error = %err, "Research session failed");
                let status = match err {
                    DeepSearchError::InvalidConfiguration(_)
                    | DeepSearchError::MissingCredential(_) => StatusCode::INTERNAL_SERVER_ERROR,
                    _ => StatusCode::BAD_GATEWAY,
                };
                error_response(status, &err.to_string())
            }
        }
    }
}

/// Session limits: settings defaults overlaid with request metadata
fn research_config(settings: &Settings, metadata: &serde_json::Value) -> ResearchConfig {
    let mut config = ResearchConfig {
        planning_model: settings.research.planning_model.clone(),
        synthesis_model: settings.research.synthesis_model.clone(),
        max_search_words: settings.research.max_search_words,
        max_planning_rounds: settings.research.max_planning_rounds,
    };
    if let Some(words) = metadata.get("max_search_words").and_then(|v| v.as_u64()) {
        config.max_search_words = words as usize;
    }
    if let Some(rounds) = metadata.get("max_planning_rounds").and_then(|v| v.as_u64()) {
        config.max_planning_rounds = rounds as u32;
    }
    config
}

/// The question is the most recent user-authored message
fn last_user_message(messages: &[RequestMessage]) -> Option<String> {
    messages
        .iter()
        .rev()
        .find(|m| m.role == "user")
        .map(|m| m.content.clone())
}

fn error_payload(message: &str) -> String {
    json!({ "error": { "message": message } }).to_string()
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": { "message": message } }))).into_response()
}
