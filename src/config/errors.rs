//! # Configuration Errors

use thiserror::Error;

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Cannot read config {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("Cannot parse config {path}: {reason}")]
    Parse { path: String, reason: String },

    #[error("Invalid config: {0}")]
    Invalid(String),
}

impl ConfigError {
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::Read { .. } => "SMILE_CONFIG_READ",
            ConfigError::Parse { .. } => "SMILE_CONFIG_PARSE",
            ConfigError::Invalid(_) => "SMILE_CONFIG_INVALID",
        }
    }
}
