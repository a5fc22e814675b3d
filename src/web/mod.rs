//! HTTP shell exposing the research agent as a chat endpoint

mod handlers;
mod routes;
mod state;

pub use handlers::{ChatCompletionResponse, ChatRequest};
pub use routes::create_router;
pub use state::AppState;
