//! Configuration management for Shoplens.
//!
//! Configuration is loaded from the platform config directory with sensible
//! defaults. A missing file means "use defaults"; credentials are never
//! stored as literals in the defaults, only as `${ENV_VAR}` references.

mod types;
mod validate;

pub use types::*;

use crate::error::{ConfigError, ShoplensError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure for Shoplens.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Model endpoint settings
    pub api: ApiConfig,

    /// Image input settings
    pub image: ImageConfig,

    /// Guess-the-segment and breakdown features
    pub engagement: EngagementConfig,

    /// Output settings
    pub output: OutputConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// Uses platform-appropriate directories:
    /// - macOS: ~/Library/Application Support/com.shoplens.shoplens/config.toml
    /// - Linux: ~/.config/shoplens/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\shoplens\config\config.toml
    ///
    /// Falls back to ~/.shoplens/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "shoplens", "shoplens")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let expanded = shellexpand::tilde("~/.shoplens/config.toml");
                PathBuf::from(expanded.into_owned())
            })
    }

    /// Write this config as TOML to `path`, creating parent directories.
    pub fn write_to(&self, path: &Path) -> crate::Result<()> {
        let toml = self.to_toml()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml).map_err(ShoplensError::Io)
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::MediaTypePolicy;
    use std::time::Duration;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(
            config.api.endpoint,
            "https://openrouter.ai/api/v1/chat/completions"
        );
        assert_eq!(config.api.model, "meta-llama/llama-4-maverick:free");
        assert_eq!(config.api.timeout(), Duration::from_secs(30));
        assert_eq!(config.image.media_type, MediaTypePolicy::Jpeg);
        assert!(config.engagement.enabled);
    }

    #[test]
    fn test_default_api_key_is_env_reference() {
        let config = Config::default();
        assert_eq!(config.api.api_key, "${OPENROUTER_API_KEY}");
    }

    #[test]
    fn test_config_to_toml() {
        let config = Config::default();
        let toml = config.to_toml().unwrap();
        assert!(toml.contains("[api]"));
        assert!(toml.contains("[image]"));
        assert!(toml.contains("[engagement]"));
    }

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[api]\ntimeout_secs = 5\n\n[image]\nmedia_type = \"detected\"\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.api.timeout(), Duration::from_secs(5));
        assert_eq!(config.api.model, "meta-llama/llama-4-maverick:free");
        assert_eq!(config.image.media_type, MediaTypePolicy::Detected);
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[api]\ntimeout_secs = 0\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("timeout_secs"));
    }

    #[test]
    fn test_load_rejects_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[api\n").unwrap();

        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_write_to_creates_parents_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a").join("b").join("config.toml");

        let mut config = Config::default();
        config.api.timeout_secs = 12;
        config.write_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.api.timeout_secs, 12);
    }

    #[test]
    fn test_write_to_reports_io_error() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should go.
        let err = Config::default().write_to(dir.path()).unwrap_err();
        assert!(matches!(err, ShoplensError::Io(_)));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = Config::default();
        let toml = config.to_toml().unwrap();
        let parsed: Config = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.api.endpoint, config.api.endpoint);
        assert_eq!(parsed.output.format, config.output.format);
    }
}
