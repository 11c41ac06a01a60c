//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.api.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "api.timeout_secs must be > 0".into(),
            ));
        }
        if !(self.api.endpoint.starts_with("http://") || self.api.endpoint.starts_with("https://"))
        {
            return Err(ConfigError::ValidationError(format!(
                "api.endpoint must be an http(s) URL, got '{}'",
                self.api.endpoint
            )));
        }
        if self.api.model.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "api.model must not be empty".into(),
            ));
        }
        if self.image.supported_formats.is_empty() {
            return Err(ConfigError::ValidationError(
                "image.supported_formats must list at least one extension".into(),
            ));
        }
        if !matches!(self.output.format.as_str(), "json" | "jsonl") {
            return Err(ConfigError::ValidationError(format!(
                "output.format must be \"json\" or \"jsonl\", got '{}'",
                self.output.format
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_passes_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.api.timeout_secs = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("timeout_secs"));
    }

    #[test]
    fn test_validate_rejects_non_http_endpoint() {
        let mut config = Config::default();
        config.api.endpoint = "openrouter.ai/api".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("api.endpoint"));
    }

    #[test]
    fn test_validate_rejects_empty_model() {
        let mut config = Config::default();
        config.api.model = "  ".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("api.model"));
    }

    #[test]
    fn test_validate_rejects_unknown_output_format() {
        let mut config = Config::default();
        config.output.format = "xml".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("output.format"));
    }
}
