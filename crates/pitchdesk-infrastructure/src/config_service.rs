//! Configuration loading.
//!
//! Reads `config.toml` (optional) and applies environment overrides on top.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use pitchdesk_core::config::AppConfig;
use pitchdesk_core::error::Result;
use pitchdesk_core::PitchdeskError;

use crate::paths::PitchdeskPaths;

pub const ENV_LLM_API_KEY: &str = "LLM_API_KEY";
pub const ENV_LLM_BASE_URL: &str = "LLM_BASE_URL";
pub const ENV_LLM_MODEL: &str = "LLM_MODEL";
pub const ENV_SEARCH_API_KEY: &str = "SEARCH_API_KEY";
pub const ENV_DATA_FILE: &str = "PITCHDESK_DATA_FILE";

/// Loads [`AppConfig`] from a TOML file plus environment variables.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: Option<PathBuf>,
}

impl ConfigService {
    /// Uses the default `~/.config/pitchdesk/config.toml`.
    pub fn new() -> Self {
        Self {
            path: PitchdeskPaths::config_file().ok(),
        }
    }

    /// Uses an explicit config file (for testing or `--config`).
    pub fn with_path(path: PathBuf) -> Self {
        Self { path: Some(path) }
    }

    /// Loads the configuration with overrides from the process environment.
    pub fn load(&self) -> Result<AppConfig> {
        let env: HashMap<String, String> = std::env::vars().collect();
        self.load_with_env(&env)
    }

    /// Loads the configuration using `env` as the environment.
    pub fn load_with_env(&self, env: &HashMap<String, String>) -> Result<AppConfig> {
        let mut config = match &self.path {
            Some(path) => read_file(path)?,
            None => AppConfig::default(),
        };
        apply_env(&mut config, env);
        Ok(config)
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new()
    }
}

fn read_file(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| PitchdeskError::config(format!("Failed to read {}: {}", path.display(), e)))?;
    let config = toml::from_str(&content)?;
    Ok(config)
}

fn apply_env(config: &mut AppConfig, env: &HashMap<String, String>) {
    let get = |key: &str| {
        env.get(key)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    };

    if let Some(key) = get(ENV_LLM_API_KEY) {
        config.llm.api_key = Some(key);
    }
    if let Some(url) = get(ENV_LLM_BASE_URL) {
        config.llm.base_url = url;
    }
    if let Some(model) = get(ENV_LLM_MODEL) {
        config.llm.model = model;
    }
    if let Some(key) = get(ENV_SEARCH_API_KEY) {
        config.search.api_key = Some(key);
    }
    if let Some(file) = get(ENV_DATA_FILE) {
        config.storage.data_file = Some(PathBuf::from(file));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let service = ConfigService::with_path(temp_dir.path().join("config.toml"));

        let config = service.load_with_env(&HashMap::new()).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_env_overrides_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[llm]\napi_key = \"from-file\"\nmodel = \"file-model\"\n",
        )
        .unwrap();

        let env = HashMap::from([
            (ENV_LLM_API_KEY.to_string(), "from-env".to_string()),
            (ENV_LLM_MODEL.to_string(), "   ".to_string()),
            (ENV_DATA_FILE.to_string(), "/tmp/store.json".to_string()),
        ]);
        let config = ConfigService::with_path(path).load_with_env(&env).unwrap();

        assert_eq!(config.llm.api_key.as_deref(), Some("from-env"));
        assert_eq!(config.llm.model, "file-model");
        assert_eq!(
            config.storage.data_file,
            Some(PathBuf::from("/tmp/store.json"))
        );
    }

    #[test]
    fn test_invalid_toml_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[llm\n").unwrap();

        let err = ConfigService::with_path(path).load_with_env(&HashMap::new()).unwrap_err();
        assert!(matches!(err, PitchdeskError::Serialization { .. }));
    }
}
