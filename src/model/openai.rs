//! OpenAI-compatible chat completion client
//!
//! Works against any chat-completions endpoint speaking the OpenAI wire
//! protocol; the shipped defaults target a Volcengine Ark root.
//! Streaming uses server-sent events: `data:` framed JSON chunks terminated
//! by `data: [DONE]`.

use super::{ChatMessage, ChatModel, TokenStream};
use crate::error::DeepSearchError;
use async_trait::async_trait;
use futures::StreamExt;
use serde_json::json;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, warn};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Chat client for one OpenAI-compatible API root
pub struct OpenAiChatModel {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl OpenAiChatModel {
    /// Create a client; an empty API key is rejected immediately
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, DeepSearchError> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(DeepSearchError::MissingCredential("ARK_API_KEY"));
        }

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|err| DeepSearchError::InvalidConfiguration(err.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            client,
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    async fn post_completion(
        &self,
        model: &str,
        messages: &[ChatMessage],
        stream: bool,
    ) -> Result<reqwest::Response, DeepSearchError> {
        let body = json!({
            "model": model,
            "messages": messages,
            "stream": stream,
        });

        self.client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|err| DeepSearchError::ModelCall(err.to_string()))?
            .error_for_status()
            .map_err(|err| DeepSearchError::ModelCall(err.to_string()))
    }
}

#[async_trait]
impl ChatModel for OpenAiChatModel {
    async fn complete(
        &self,
        model: &str,
        messages: &[ChatMessage],
    ) -> Result<String, DeepSearchError> {
        debug!(model = model, messages = messages.len(), "Model completion");
        let response = self.post_completion(model, messages, false).await?;
        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|err| DeepSearchError::ModelCall(err.to_string()))?;

        payload["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| {
                DeepSearchError::ModelCall("response carried no message content".to_string())
            })
    }

    async fn complete_stream(
        &self,
        model: &str,
        messages: &[ChatMessage],
    ) -> Result<TokenStream, DeepSearchError> {
        debug!(model = model, messages = messages.len(), "Model stream");
        let response = self.post_completion(model, messages, true).await?;

        let (tx, rx) = mpsc::channel::<Result<String, DeepSearchError>>(32);
        tokio::spawn(async move {
            let mut body = response.bytes_stream();
            let mut buffer = String::new();

            while let Some(chunk) = body.next().await {
                let bytes = match chunk {
                    Ok(bytes) => bytes,
                    Err(err) => {
                        let _ = tx.send(Err(DeepSearchError::ModelCall(err.to_string()))).await;
                        return;
                    }
                };
                buffer.push_str(&String::from_utf8_lossy(&bytes));

                while let Some(pos) = buffer.find('\n') {
                    let line = buffer[..pos].trim().to_string();
                    buffer.drain(..=pos);

                    let Some(data) = line.strip_prefix("data:") else {
                        continue;
                    };
                    let data = data.trim();
                    if data == "[DONE]" {
                        return;
                    }

                    match serde_json::from_str::<serde_json::Value>(data) {
                        Ok(value) => {
                            if let Some(token) =
                                value["choices"][0]["delta"]["content"].as_str()
                            {
                                if !token.is_empty()
                                    && tx.send(Ok(token.to_string())).await.is_err()
                                {
                                    // Consumer went away; stop reading
                                    return;
                                }
                            }
                        }
                        Err(err) => {
                            warn!(error = %err, "Skipping malformed stream chunk");
                        }
                    }
                }
            }
        });

        Ok(Box::pin(ReceiverStream::new(rx)))
    }
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
            OpenAiChatModel::new("https://api.example.org/v3", ""),
            Err(DeepSearchError::MissingCredential("ARK_API_KEY"))
        ));
    }

    #[test]
    fn test_completions_url_derived_from_base() {
        let model = OpenAiChatModel::new("https://api.example.org/v3/", "k").unwrap();
        assert_eq!(
            model.completions_url(),
            "https://api.example.org/v3/chat/completions"
        );
    }

    #[tokio::test]
    async fn test_complete_parses_message_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("Authorization", "Bearer k"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{ "message": { "role": "assistant", "content": "hello" } }]
            })))
            .mount(&server)
            .await;

        let model = OpenAiChatModel::new(&server.uri(), "k").unwrap();
        let answer = model
            .complete("m", &[ChatMessage::user("hi")])
            .await
            .unwrap();
        assert_eq!(answer, "hello");
    }

    #[tokio::test]
    async fn test_complete_http_error_is_model_call_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let model = OpenAiChatModel::new(&server.uri(), "k").unwrap();
        let err = model
            .complete("m", &[ChatMessage::user("hi")])
            .await
            .unwrap_err();
        assert!(matches!(err, DeepSearchError::ModelCall(_)));
    }

    #[tokio::test]
    async fn test_stream_parses_sse_tokens() {
        let server = MockServer::start().await;
        let sse_body = concat!(
            "data: {\"choices\":[{\"delta\":{\"role\":\"assistant\"}}]}\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"Hel\"}}]}\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"lo\"}}]}\n\n",
            "data: [DONE]\n\n",
        );
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("Content-Type", "text/event-stream")
                    .set_body_string(sse_body),
            )
            .mount(&server)
            .await;

        let model = OpenAiChatModel::new(&server.uri(), "k").unwrap();
        let mut stream = model
            .complete_stream("m", &[ChatMessage::user("hi")])
            .await
            .unwrap();

        let mut answer = String::new();
        while let Some(token) = stream.next().await {
            answer.push_str(&token.unwrap());
        }
        assert_eq!(answer, "Hello");
    }
}
