//! Research progress events and the chat-completion chunk protocol
//!
//! The streaming entry point emits [`ResearchEvent`]s; this module also
//! renders them as `chat.completion.chunk` payloads so any incremental
//! chat-completion consumer can follow a session. Progress events travel in
//! the `reasoning_content` delta field (where reasoning models put their
//! non-answer output), answer tokens in `content`, and `Done` closes the
//! choice with `finish_reason: "stop"`.

use serde::{Deserialize, Serialize};

/// One step of a streamed research session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResearchEvent {
    /// A planning round began (1-based for display)
    RoundStarted { round: u32 },
    /// The planner chose the round's queries
    QueriesPlanned { round: u32, queries: Vec<String> },
    /// The round's search batch completed and was committed
    SearchCompleted {
        round: u32,
        result_count: usize,
        reference_count: usize,
    },
    /// Planning finished, synthesis is starting
    SynthesisStarted,
    /// One increment of the final answer
    AnswerDelta { content: String },
    /// The session reached its terminal state
    Done,
}

impl ResearchEvent {
    /// Render this event as one chat-completion chunk
    pub fn to_chunk(&self, id: &str, model: &str) -> ChatCompletionChunk {
        let (delta, finish_reason) = match self {
            ResearchEvent::RoundStarted { round } => (
                ChunkDelta::reasoning(format!("[round {}] planning\n", round)),
                None,
            ),
            ResearchEvent::QueriesPlanned { round, queries } => (
                ChunkDelta::reasoning(format!(
                    "[round {}] searching: {}\n",
                    round,
                    queries.join("; ")
                )),
                None,
            ),
            ResearchEvent::SearchCompleted {
                round,
                result_count,
                reference_count,
            } => (
                ChunkDelta::reasoning(format!(
                    "[round {}] {} results, {} references gathered\n",
                    round, result_count, reference_count
                )),
                None,
            ),
            ResearchEvent::SynthesisStarted => {
                (ChunkDelta::reasoning("[synthesis] writing answer\n"), None)
            }
            ResearchEvent::AnswerDelta { content } => {
                (ChunkDelta::content(content.clone()), None)
            }
            ResearchEvent::Done => (ChunkDelta::default(), Some("stop".to_string())),
        };

        ChatCompletionChunk {
            id: id.to_string(),
            object: "chat.completion.chunk".to_string(),
            created: chrono::Utc::now().timestamp(),
            model: model.to_string(),
            choices: vec![ChunkChoice {
                index: 0,
                delta,
                finish_reason,
            }],
        }
    }
}

/// One incremental chunk of a streamed chat completion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionChunk {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub model: String,
    pub choices: Vec<ChunkChoice>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkChoice {
    pub index: u32,
    pub delta: ChunkDelta,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChunkDelta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning_content: Option<String>,
}

impl ChunkDelta {
    fn content(content: impl Into<String>) -> Self {
        Self {
            role: Some("assistant".to_string()),
            content: Some(content.into()),
            reasoning_content: None,
        }
    }

    fn reasoning(reasoning: impl Into<String>) -> Self {
        Self {
            role: Some("assistant".to_string()),
            content: None,
            reasoning_content: Some(reasoning.into()),
        }
    }
}
