//! Settings structures for DeepSearch-RS configuration
//!
//! Settings are resolved once at startup (YAML file plus environment
//! overrides) and passed by value into the components that need them; core
//! logic never reads the environment.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main settings structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub model: ModelSettings,
    pub research: ResearchSettings,
    pub search: SearchSettings,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = serde_yaml::from_str(&content)?;
        Ok(settings)
    }

    /// Merge with environment variables
    ///
    /// Provider credentials and model settings keep their historical
    /// deployment names; server knobs use the DEEPSEARCH_ prefix.
    pub fn merge_env(&mut self) {
        if let Ok(val) = std::env::var("DEEPSEARCH_BIND_ADDRESS") {
            self.server.bind_address = val;
        }
        if let Ok(val) = std::env::var("DEEPSEARCH_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Ok(val) = std::env::var("API_ADDR") {
            self.model.base_url = val;
        }
        if let Ok(val) = std::env::var("ARK_API_KEY") {
            self.model.api_key = val;
        }
        if let Ok(val) = std::env::var("REASONING_MODEL") {
            self.research.planning_model = val.clone();
            self.research.synthesis_model = val;
        }
        if let Ok(val) = std::env::var("SEARCH_ENGINE") {
            self.search.provider = val;
        }
        if let Ok(val) = std::env::var("TAVILY_API_KEY") {
            self.search.tavily_api_key = val;
        }
        if let Ok(val) = std::env::var("YOU_API_KEY") {
            self.search.you_api_key = val;
        }
        if let Ok(val) = std::env::var("ASK_ECHO_API_KEY") {
            self.search.ask_echo_api_key = val;
        }
        if let Ok(val) = std::env::var("ASK_ECHO_AGENT_ID") {
            self.search.ask_echo_agent_id = val;
        }
        if let Ok(val) = std::env::var("ASK_ECHO_BASE_URL") {
            let val = val.trim().to_string();
            if !val.is_empty() {
                self.search.ask_echo_base_url = Some(val);
            }
        }
    }
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub bind_address: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 7859,
        }
    }
}

/// Chat-completion endpoint used for planning and synthesis
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    /// OpenAI-compatible API root
    pub base_url: String,
    pub api_key: String,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            base_url: "https://ark.ap-southeast.bytepluses.com/api/v3".to_string(),
            api_key: String::new(),
        }
    }
}

/// Research loop limits and model identifiers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResearchSettings {
    pub planning_model: String,
    pub synthesis_model: String,
    /// Maximum queries per planning round
    pub max_search_words: usize,
    /// Maximum planning rounds per session
    pub max_planning_rounds: u32,
}

impl Default for ResearchSettings {
    fn default() -> Self {
        Self {
            planning_model: "deepseek-r1-250528".to_string(),
            synthesis_model: "deepseek-r1-250528".to_string(),
            max_search_words: 5,
            max_planning_rounds: 5,
        }
    }
}

/// Search provider selection and credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Configured provider; empty or unknown falls back to the default
    pub provider: String,
    /// Provider used when the selection is empty or unknown
    pub default_provider: String,
    pub you_api_key: String,
    pub tavily_api_key: String,
    pub ask_echo_api_key: String,
    pub ask_echo_agent_id: String,
    pub ask_echo_base_url: Option<String>,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            provider: String::new(),
            default_provider: "tavily".to_string(),
            you_api_key: String::new(),
            tavily_api_key: String::new(),
            ask_echo_api_key: String::new(),
            ask_echo_agent_id: String::new(),
            ask_echo_base_url: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 7859);
        assert_eq!(settings.research.max_search_words, 5);
        assert_eq!(settings.research.max_planning_rounds, 5);
        assert_eq!(settings.search.default_provider, "tavily");
        assert!(settings.search.ask_echo_base_url.is_none());
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let yaml = r#"
search:
  provider: ask_echo
  ask_echo_api_key: k
  ask_echo_agent_id: a
research:
  max_planning_rounds: 3
"#;
        let settings: Settings = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(settings.search.provider, "ask_echo");
        assert_eq!(settings.research.max_planning_rounds, 3);
        // Untouched sections keep their defaults
        assert_eq!(settings.research.max_search_words, 5);
        assert_eq!(settings.server.port, 7859);
    }
}
