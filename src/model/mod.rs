//! The chat model capability used for planning and synthesis
//!
//! The research loop consumes the model as an opaque "ask for text given
//! context" dependency. Retry and backoff policy belongs to the implementor;
//! a failure surfaced here is fatal to the session.

pub mod openai;

use crate::error::DeepSearchError;
use async_trait::async_trait;
use futures::Stream;
use serde::{Deserialize, Serialize};
use std::pin::Pin;

pub use openai::OpenAiChatModel;

/// One chat message in a model conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// Ordered, finite stream of answer tokens
pub type TokenStream = Pin<Box<dyn Stream<Item = Result<String, DeepSearchError>> + Send>>;

/// Abstract chat completion capability
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Request one full completion
    async fn complete(
        &self,
        model: &str,
        messages: &[ChatMessage],
    ) -> Result<String, DeepSearchError>;

    /// Request a completion as an incremental token stream
    async fn complete_stream(
        &self,
        model: &str,
        messages: &[ChatMessage],
    ) -> Result<TokenStream, DeepSearchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_constructors() {
        assert_eq!(ChatMessage::system("s").role, "system");
        assert_eq!(ChatMessage::user("u").role, "user");
        assert_eq!(ChatMessage::assistant("a").content, "a");
    }
}
