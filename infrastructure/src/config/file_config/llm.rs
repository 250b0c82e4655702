//! Language model configuration from TOML (`[llm]` section)

use super::ConfigValidationError;
use serde::{Deserialize, Serialize};

/// OpenAI-compatible chat completion endpoint
///
/// # Example
///
/// ```toml
/// [llm]
/// model = "gpt-4o-mini"
/// base_url = "https://api.openai.com/v1"
/// api_key_env = "OPENAI_API_KEY"
/// temperature = 0.2
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLlmConfig {
    pub model: String,
    pub base_url: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Direct API key (not recommended, use the env var instead)
    pub api_key: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Bound on every model call
    pub timeout_seconds: u64,
}

impl Default for FileLlmConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            api_key: None,
            temperature: 0.2,
            max_tokens: 1024,
            timeout_seconds: 30,
        }
    }
}

impl FileLlmConfig {
    /// API key from the config file or the configured environment variable
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .filter(|k| !k.trim().is_empty())
    }

    pub(super) fn validate(&self) -> Vec<ConfigValidationError> {
        let mut issues = Vec::new();
        if self.model.trim().is_empty() {
            issues.push(ConfigValidationError::Empty { field: "llm.model" });
        }
        if self.base_url.trim().is_empty() {
            issues.push(ConfigValidationError::Empty {
                field: "llm.base_url",
            });
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            issues.push(ConfigValidationError::OutOfRange {
                field: "llm.temperature",
                value: self.temperature.to_string(),
                expected: "[0, 2]",
            });
        }
        if self.max_tokens == 0 {
            issues.push(ConfigValidationError::Zero {
                field: "llm.max_tokens",
            });
        }
        if self.timeout_seconds == 0 {
            issues.push(ConfigValidationError::Zero {
                field: "llm.timeout_seconds",
            });
        }
        issues
    }
}
