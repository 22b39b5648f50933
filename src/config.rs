use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{LokalizeError, Result};
use crate::models::{Backend, DEFAULT_MODEL_ID};

fn default_model() -> String {
    DEFAULT_MODEL_ID.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Model used when none is given on the command line
    #[serde(default = "default_model")]
    pub default_model: String,
    pub openai: OpenAiConfig,
    pub google: GoogleConfig,
    pub request: RequestConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    /// Base URL of the chat completions API
    pub endpoint: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleConfig {
    /// Base URL of the Generative Language API
    pub endpoint: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestConfig {
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Sampling temperature sent to backends that accept one
    pub temperature: f64,
    /// Upper bound on completion tokens for single-language extraction
    pub single_max_tokens: u32,
    /// Upper bound on completion tokens for multi-language extraction
    pub multi_max_tokens: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// File stem for per-language output files (`<stem>.<language>.json`)
    pub file_stem: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_model: default_model(),
            openai: OpenAiConfig {
                endpoint: "https://api.openai.com/v1".to_string(),
                api_key_env: "OPENAI_API_KEY".to_string(),
            },
            google: GoogleConfig {
                endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
                api_key_env: "GEMINI_API_KEY".to_string(),
            },
            request: RequestConfig {
                timeout_secs: 120,
                temperature: 0.1,
                single_max_tokens: 4000,
                multi_max_tokens: 8000,
            },
            output: OutputConfig {
                file_stem: "translations".to_string(),
            },
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| LokalizeError::Config(format!("Failed to read config file: {}", e)))?;

        Ok(toml::from_str(&content)?)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| LokalizeError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| LokalizeError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    pub fn api_key_env(&self, backend: Backend) -> &str {
        match backend {
            Backend::OpenAi => &self.openai.api_key_env,
            Backend::Google => &self.google.api_key_env,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lokalize.toml");

        let mut config = Config::default();
        config.default_model = "gemini-2.0-flash".to_string();
        config.google.endpoint = "http://localhost:8080/v1beta".to_string();
        config.save_to_file(&path).unwrap();

        let loaded = Config::from_file(&path).unwrap();
        assert_eq!(loaded.default_model, "gemini-2.0-flash");
        assert_eq!(loaded.google.endpoint, "http://localhost:8080/v1beta");
        assert_eq!(loaded.api_key_env(Backend::OpenAi), "OPENAI_API_KEY");
        assert_eq!(loaded.request.multi_max_tokens, 8000);
    }

    #[test]
    fn test_missing_default_model_falls_back() {
        let mut value = toml::Value::try_from(Config::default()).unwrap();
        value.as_table_mut().unwrap().remove("default_model");
        let config: Config = toml::from_str(&toml::to_string(&value).unwrap()).unwrap();
        assert_eq!(config.default_model, DEFAULT_MODEL_ID);
    }

    #[test]
    fn test_malformed_file_is_toml_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lokalize.toml");
        std::fs::write(&path, "default_model = [\n").unwrap();

        let err = Config::from_file(&path).unwrap_err();
        assert!(matches!(err, LokalizeError::Toml(_)));
        assert!(err.to_string().starts_with("TOML parsing error"));
    }

    #[test]
    fn test_unreadable_file_is_config_error() {
        let err = Config::from_file("/nonexistent/lokalize.toml").unwrap_err();
        assert!(matches!(err, LokalizeError::Config(_)));
    }
}
