//! # Database Errors

use thiserror::Error;

use crate::sql::CodecError;
use crate::table::CompileError;

/// Result type for database operations
pub type DatabaseResult<T> = Result<T, DatabaseError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DatabaseError {
    #[error("Failed to open database at {path}: {reason}")]
    Open { path: String, reason: String },

    #[error("DDL statement failed: {reason}\n{statement}")]
    Ddl { statement: String, reason: String },

    #[error("SQLite error: {0}")]
    Sqlite(String),

    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("Meta table unavailable: {0}")]
    MetaTable(#[from] CompileError),

    #[error("Database connection lock poisoned")]
    Poisoned,

    #[error("Database worker failed: {0}")]
    Worker(String),
}

impl DatabaseError {
    pub fn code(&self) -> &'static str {
        match self {
            DatabaseError::Open { .. } => "SMILE_DB_OPEN",
            DatabaseError::Ddl { .. } => "SMILE_DB_DDL",
            DatabaseError::Sqlite(_) => "SMILE_DB_SQLITE",
            DatabaseError::Codec(_) => "SMILE_DB_CODEC",
            DatabaseError::MetaTable(_) => "SMILE_DB_META_TABLE",
            DatabaseError::Poisoned => "SMILE_DB_POISONED",
            DatabaseError::Worker(_) => "SMILE_DB_WORKER",
        }
    }
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        DatabaseError::Sqlite(err.to_string())
    }
}
