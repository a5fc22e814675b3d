//! Application state shared across handlers

use crate::config::Settings;
use crate::model::ChatModel;
use std::sync::Arc;

/// Shared application state
///
/// The search adapter is not held here: request metadata may select the
/// provider, so the handler builds the adapter per request from settings.
#[derive(Clone)]
pub struct AppState {
    /// Global settings
    pub settings: Arc<Settings>,
    /// Planning/synthesis model capability
    pub model: Arc<dyn ChatModel>,
}

impl AppState {
    pub fn new(settings: Settings, model: Arc<dyn ChatModel>) -> Self {
        Self {
            settings: Arc::new(settings),
            model,
        }
    }
}
