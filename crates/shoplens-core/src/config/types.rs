//! Sub-configuration structs with their defaults.

use crate::asset::MediaTypePolicy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default OpenRouter chat-completions endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Default multimodal model.
pub const DEFAULT_MODEL: &str = "meta-llama/llama-4-maverick:free";

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "OPENROUTER_API_KEY";

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Model endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Chat-completions URL
    pub endpoint: String,

    /// Model identifier
    pub model: String,

    /// API key (supports ${ENV_VAR} syntax)
    pub api_key: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: format!("${{{API_KEY_ENV}}}"),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// The configured key with `${ENV_VAR}` references resolved.
    pub fn resolved_api_key(&self) -> Option<String> {
        resolve_env_var(&self.api_key)
    }
}

/// Image input settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    /// Data URL media type: "jpeg" (always image/jpeg) or "detected"
    pub media_type: MediaTypePolicy,

    /// File extensions picked up when classifying a directory
    pub supported_formats: Vec<String>,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            media_type: MediaTypePolicy::Jpeg,
            supported_formats: vec!["jpg".to_string(), "jpeg".to_string(), "png".to_string()],
        }
    }
}

/// Guess-the-segment prompt, label explanations, and the segment breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngagementConfig {
    pub enabled: bool,
}

impl Default for EngagementConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format ("json" or "jsonl")
    pub format: String,

    /// Pretty-print JSON output
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "json".to_string(),
            pretty: true,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// Resolve `${ENV_VAR}` references in config strings.
///
/// Empty strings and unset variables resolve to `None`.
pub fn resolve_env_var(value: &str) -> Option<String> {
    let resolved = if value.starts_with("${") && value.ends_with('}') {
        let var_name = &value[2..value.len() - 1];
        std::env::var(var_name).ok()?
    } else {
        value.to_string()
    };
    if resolved.trim().is_empty() {
        None
    } else {
        Some(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_env_var() {
        // Non-env-var strings pass through
        assert_eq!(resolve_env_var("plain-key"), Some("plain-key".to_string()));
        // Empty and blank return None
        assert_eq!(resolve_env_var(""), None);
        assert_eq!(resolve_env_var("   "), None);
        // Unset env var returns None
        assert_eq!(resolve_env_var("${DEFINITELY_NOT_SET_SHOPLENS_123}"), None);
    }

    #[test]
    fn test_resolve_env_var_reads_environment() {
        std::env::set_var("SHOPLENS_TEST_RESOLVE_KEY", "sk-from-env");
        assert_eq!(
            resolve_env_var("${SHOPLENS_TEST_RESOLVE_KEY}"),
            Some("sk-from-env".to_string())
        );
        std::env::remove_var("SHOPLENS_TEST_RESOLVE_KEY");
    }

    #[test]
    fn test_default_supported_formats() {
        let config = ImageConfig::default();
        assert_eq!(config.supported_formats, vec!["jpg", "jpeg", "png"]);
    }
}
