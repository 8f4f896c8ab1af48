//! CLI-specific error types
//!
//! Every CLI error ends the process with a non-zero exit code.

use std::fmt;
use std::io;

use crate::config::ConfigError;
use crate::experiment::{BuildError, TableFailure};

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (stdout, script output)
    IoError,
    /// One or more tables failed to compile
    CompileFailed,
    /// Database initialization failed
    BuildFailed,
    /// Async runtime could not start
    RuntimeFailed,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "SMILE_CLI_CONFIG_ERROR",
            Self::IoError => "SMILE_CLI_IO_ERROR",
            Self::CompileFailed => "SMILE_CLI_COMPILE_FAILED",
            Self::BuildFailed => "SMILE_CLI_BUILD_FAILED",
            Self::RuntimeFailed => "SMILE_CLI_RUNTIME_FAILED",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    /// Summarizes every failed table in one message
    pub fn compile_failed(failures: &[TableFailure]) -> Self {
        let tables = failures
            .iter()
            .map(|f| format!("{} ({})", f.table, f.code))
            .collect::<Vec<_>>()
            .join(", ");
        Self::new(
            CliErrorCode::CompileFailed,
            format!("{} table(s) failed to compile: {}", failures.len(), tables),
        )
    }

    pub fn build_failed(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::BuildFailed, msg)
    }

    pub fn runtime_failed(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::RuntimeFailed, msg)
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::config_error(format!("{} ({})", e, e.code()))
    }
}

impl From<BuildError> for CliError {
    fn from(e: BuildError) -> Self {
        Self::build_failed(format!("{} ({})", e, e.code()))
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::CompileError;

    #[test]
    fn test_compile_failed_lists_tables() {
        let err = CliError::compile_failed(&[
            TableFailure::from(&CompileError::MissingTrialId { table: "_experiment-v1".into() }),
            TableFailure::from(&CompileError::NoColumns { table: "_stimuli-words".into() }),
        ]);
        assert_eq!(err.code(), &CliErrorCode::CompileFailed);
        assert!(err.message().starts_with("2 table(s)"));
        assert!(err.message().contains("_experiment-v1 (SMILE_MISSING_TRIAL_ID)"));
        assert!(err.to_string().starts_with("SMILE_CLI_COMPILE_FAILED: "));
    }

    #[test]
    fn test_config_error_conversion() {
        let err: CliError = ConfigError::Invalid("batch_size must be at least 1".into()).into();
        assert_eq!(err.code_str(), "SMILE_CLI_CONFIG_ERROR");
        assert!(err.message().contains("SMILE_CONFIG_INVALID"));
    }
}
