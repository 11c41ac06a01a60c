//! Error types for Shoplens.
//!
//! Classification failures are kept separate from configuration failures so
//! the CLI can report a failed image without treating it as a fatal setup
//! problem.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for Shoplens operations.
#[derive(Error, Debug)]
pub enum ShoplensError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Classification call errors
    #[error("Classification error: {0}")]
    Classification(#[from] ClassificationError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Why a single classification call failed.
///
/// Every variant is terminal for the invocation that produced it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClassificationError {
    /// No API key was supplied; no request was sent.
    #[error("No API key supplied. Pass --api-key or set OPENROUTER_API_KEY.")]
    MissingCredential,

    /// The image could not be read or was empty; no request was sent.
    #[error("Invalid image {path}: {message}")]
    InvalidImage { path: PathBuf, message: String },

    /// The endpoint answered with a status other than 200.
    #[error("Failed to get response: HTTP {status}: {body}")]
    Remote { status: u16, body: String },

    /// The endpoint answered 200 but the body did not carry a label.
    #[error("Malformed response from model endpoint: {message}")]
    MalformedResponse { message: String },

    /// The request did not complete within the configured timeout.
    #[error("The request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// Any other network failure (DNS, refused connection, reset, TLS).
    #[error("Request failed: {message}")]
    Transport { message: String },
}

impl ClassificationError {
    /// Short machine-friendly kind, used in output records and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingCredential => "missing_credential",
            Self::InvalidImage { .. } => "invalid_image",
            Self::Remote { .. } => "remote_error",
            Self::MalformedResponse { .. } => "malformed_response",
            Self::Timeout { .. } => "timeout",
            Self::Transport { .. } => "transport_error",
        }
    }
}

/// Convenience type alias for Shoplens results.
pub type Result<T> = std::result::Result<T, ShoplensError>;

/// Convenience type alias for classification results.
pub type ClassificationResult<T> = std::result::Result<T, ClassificationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_error_display_includes_status_and_body() {
        let err = ClassificationError::Remote {
            status: 401,
            body: "{\"error\":\"bad key\"}".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("401"));
        assert!(msg.contains("bad key"));
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(ClassificationError::MissingCredential.kind(), "missing_credential");
        assert_eq!(
            ClassificationError::Timeout { timeout_ms: 1000 }.kind(),
            "timeout"
        );
    }
}
