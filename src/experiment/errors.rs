//! # Build Errors
//!
//! Only failures that stop the whole build live here. Per-table compile
//! failures and per-dataset seeding problems are reported in `BuildReport`.

use thiserror::Error;

use crate::database::DatabaseError;

/// Result type for builds
pub type BuildResult<T> = Result<T, BuildError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildError {
    #[error("Failed to write SQL script {path}: {reason}")]
    Script { path: String, reason: String },

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl BuildError {
    pub fn code(&self) -> &'static str {
        match self {
            BuildError::Script { .. } => "SMILE_BUILD_SCRIPT",
            BuildError::Database(e) => e.code(),
        }
    }
}
