//! Route definitions

use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/v1/ping", get(handlers::ping))
        .route(
            "/api/v3/bots/chat/completions",
            post(handlers::chat_completions),
        )
        .layer(cors)
        .with_state(state)
}
