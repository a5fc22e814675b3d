//! Provider selection and adapter construction
//!
//! Translates display-name aliases to canonical provider identifiers and
//! builds the configured adapter. Credential validation happens here, at
//! construction time, so a misconfigured provider fails before any session
//! starts.

use super::ask_echo::AskEchoEngine;
use super::tavily::TavilyEngine;
use super::traits::SearchEngine;
use super::you::YouEngine;
use crate::config::SearchSettings;
use crate::error::DeepSearchError;
use std::sync::Arc;
use tracing::{debug, info};

/// Translate a display name to its canonical provider identifier
pub fn resolve_alias(name: &str) -> &str {
    match name {
        "BytePlusAskEchoSearchAgent" => "ask_echo",
        "You.com" => "you",
        "Tavily" => "tavily",
        other => other,
    }
}

/// Build the adapter for `selected`, falling back to the configured default
///
/// `selected` overrides the settings-level provider (per-request selection);
/// an unknown or empty name falls back to `settings.default_provider`, and an
/// unknown default is a configuration error.
pub fn build_engine(
    settings: &SearchSettings,
    selected: Option<&str>,
) -> Result<Arc<dyn SearchEngine>, DeepSearchError> {
    let requested = selected.unwrap_or(&settings.provider);
    let canonical = resolve_alias(requested.trim());

    if let Some(engine) = construct(canonical, settings)? {
        info!(provider = canonical, "Search engine selected");
        return Ok(engine);
    }

    let default = resolve_alias(settings.default_provider.trim());
    debug!(
        requested = canonical,
        default = default,
        "Unknown provider, falling back to default"
    );
    match construct(default, settings)? {
        Some(engine) => {
            info!(provider = default, "Search engine selected");
            Ok(engine)
        }
        None => Err(DeepSearchError::InvalidConfiguration(format!(
            "unknown default search provider: {:?}",
            settings.default_provider
        ))),
    }
}

/// Construct one named adapter; `Ok(None)` means the name is unknown
fn construct(
    name: &str,
    settings: &SearchSettings,
) -> Result<Option<Arc<dyn SearchEngine>>, DeepSearchError> {
    let engine: Arc<dyn SearchEngine> = match name {
        "you" => Arc::new(YouEngine::new(&settings.you_api_key)?),
        "ask_echo" => Arc::new(AskEchoEngine::new(
            &settings.ask_echo_api_key,
            &settings.ask_echo_agent_id,
            settings.ask_echo_base_url.as_deref(),
        )?),
        "tavily" => Arc::new(TavilyEngine::new(&settings.tavily_api_key)?),
        _ => return Ok(None),
    };
    Ok(Some(engine))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> SearchSettings {
        SearchSettings {
            provider: "you".to_string(),
            default_provider: "tavily".to_string(),
            you_api_key: "you-key".to_string(),
            tavily_api_key: "tavily-key".to_string(),
            ask_echo_api_key: "echo-key".to_string(),
            ask_echo_agent_id: "echo-agent".to_string(),
            ask_echo_base_url: None,
        }
    }

    #[test]
    fn test_alias_resolution() {
        assert_eq!(resolve_alias("BytePlusAskEchoSearchAgent"), "ask_echo");
        assert_eq!(resolve_alias("tavily"), "tavily");
        assert_eq!(resolve_alias("something-else"), "something-else");
    }

    #[test]
    fn test_configured_provider_selected() {
        let engine = build_engine(&settings(), None).unwrap();
        assert_eq!(engine.name(), "you");
    }

    #[test]
    fn test_request_override_beats_settings() {
        let engine = build_engine(&settings(), Some("ask_echo")).unwrap();
        assert_eq!(engine.name(), "ask_echo");
    }

    #[test]
    fn test_display_alias_selects_adapter() {
        let engine = build_engine(&settings(), Some("BytePlusAskEchoSearchAgent")).unwrap();
        assert_eq!(engine.name(), "ask_echo");
    }

    #[test]
    fn test_unknown_provider_falls_back_to_default() {
        let engine = build_engine(&settings(), Some("volc_bot")).unwrap();
        assert_eq!(engine.name(), "tavily");
    }

    #[test]
    fn test_unknown_default_is_configuration_error() {
        let mut s = settings();
        s.default_provider = "nope".to_string();
        let err = build_engine(&s, Some("also-nope")).unwrap_err();
        assert!(matches!(err, DeepSearchError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_missing_credential_is_fatal_at_construction() {
        let mut s = settings();
        s.you_api_key = String::new();
        let err = build_engine(&s, Some("you")).unwrap_err();
        assert!(matches!(
            err,
            DeepSearchError::MissingCredential("YOU_API_KEY")
        ));
    }
}
