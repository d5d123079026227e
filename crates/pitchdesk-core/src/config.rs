//! Application configuration model.
//!
//! The file lives at `~/.config/pitchdesk/config.toml`; every section and
//! field is optional. Loading and environment overrides are handled by the
//! infrastructure layer.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::generation::GenerationParams;

pub const DEFAULT_LLM_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_LLM_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_SEARCH_MODEL: &str = "gemini-2.5-flash";

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub radar: RadarConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// OpenAI-compatible chat completions endpoint.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct LlmConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,
    #[serde(default = "default_llm_model")]
    pub model: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_llm_base_url(),
            model: default_llm_model(),
            timeout_secs: default_timeout_secs(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

impl LlmConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn params(&self) -> GenerationParams {
        GenerationParams {
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}

/// Channel discovery settings.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct SearchConfig {
    /// Key for the grounded web-search backend. Without it radar search
    /// always comes back empty.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_search_model")]
    pub model: String,
    /// Maximum number of candidates a radar search returns.
    #[serde(default = "default_result_limit")]
    pub result_limit: usize,
    /// How many raw items are requested per wanted candidate.
    #[serde(default = "default_over_fetch_factor")]
    pub over_fetch_factor: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_search_model(),
            result_limit: default_result_limit(),
            over_fetch_factor: default_over_fetch_factor(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct RadarConfig {
    /// Page size of the connected-channels and templates lists.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Default for RadarConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct StorageConfig {
    /// JSON snapshot file. When absent, the front-end decides where data lives.
    #[serde(default)]
    pub data_file: Option<PathBuf>,
}

fn default_llm_base_url() -> String {
    DEFAULT_LLM_BASE_URL.to_string()
}

fn default_llm_model() -> String {
    DEFAULT_LLM_MODEL.to_string()
}

fn default_search_model() -> String {
    DEFAULT_SEARCH_MODEL.to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    2000
}

fn default_result_limit() -> usize {
    20
}

fn default_over_fetch_factor() -> usize {
    3
}

fn default_page_size() -> usize {
    5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.llm.timeout(), Duration::from_secs(60));
        assert_eq!(config.radar.page_size, 5);
        assert_eq!(config.search.result_limit, 20);
    }

    #[test]
    fn test_partial_section() {
        let config: AppConfig = toml::from_str(
            r#"
            [llm]
            api_key = "sk-test"
            model = "local-model"

            [storage]
            data_file = "/tmp/pitchdesk.json"
            "#,
        )
        .unwrap();

        assert_eq!(config.llm.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.llm.model, "local-model");
        assert_eq!(config.llm.base_url, DEFAULT_LLM_BASE_URL);
        assert_eq!(
            config.storage.data_file,
            Some(PathBuf::from("/tmp/pitchdesk.json"))
        );
    }
}
