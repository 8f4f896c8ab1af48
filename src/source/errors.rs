//! # Source Errors
//!
//! Resolution errors (`UnsupportedSourceType`, `NoMatchingFiles`,
//! `InvalidPattern`) are fatal to one dataset's seeding. Decode and I/O errors
//! are fatal to one source.

use std::path::Path;

use thiserror::Error;

/// Result type for source operations
pub type SourceResult<T> = Result<T, SourceError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    // Resolution
    #[error("No decoder for '.{extension}' files: {path}")]
    UnsupportedSourceType { extension: String, path: String },

    #[error("Dataset '{dataset}': no files matched {} under {base_dir}", .patterns.join(", "))]
    NoMatchingFiles {
        dataset: String,
        base_dir: String,
        patterns: Vec<String>,
    },

    #[error("Invalid source pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    // Loading
    #[error("Failed to decode {path}: {reason}")]
    Decode { path: String, reason: String },

    #[error("I/O error on {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("Source worker failed: {0}")]
    Worker(String),
}

impl SourceError {
    pub fn code(&self) -> &'static str {
        match self {
            SourceError::UnsupportedSourceType { .. } => "SMILE_UNSUPPORTED_SOURCE_TYPE",
            SourceError::NoMatchingFiles { .. } => "SMILE_NO_MATCHING_FILES",
            SourceError::InvalidPattern { .. } => "SMILE_INVALID_PATTERN",
            SourceError::Decode { .. } => "SMILE_SOURCE_DECODE",
            SourceError::Io { .. } => "SMILE_SOURCE_IO",
            SourceError::Worker(_) => "SMILE_SOURCE_WORKER",
        }
    }

    /// True for errors raised while resolving patterns, before any file is read.
    pub fn is_resolution_error(&self) -> bool {
        matches!(
            self,
            SourceError::UnsupportedSourceType { .. }
                | SourceError::NoMatchingFiles { .. }
                | SourceError::InvalidPattern { .. }
        )
    }

    pub(crate) fn decode(path: &Path, reason: impl ToString) -> Self {
        SourceError::Decode {
            path: path.display().to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn io(path: &Path, err: std::io::Error) -> Self {
        SourceError::Io {
            path: path.display().to_string(),
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_names_extension_and_path() {
        let err = SourceError::UnsupportedSourceType {
            extension: "xlsx".into(),
            path: "/data/stimuli/words.xlsx".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains(".xlsx"));
        assert!(msg.contains("/data/stimuli/words.xlsx"));
        assert_eq!(err.code(), "SMILE_UNSUPPORTED_SOURCE_TYPE");
        assert!(err.is_resolution_error());
    }

    #[test]
    fn test_no_matching_files_lists_patterns() {
        let err = SourceError::NoMatchingFiles {
            dataset: "words".into(),
            base_dir: "/data/stimuli".into(),
            patterns: vec!["*.csv".into(), "extra/*.tsv".into()],
        };
        assert!(err.to_string().contains("*.csv, extra/*.tsv"));
        assert!(!SourceError::Worker("panic".into()).is_resolution_error());
    }
}
