//! # Seeding Errors
//!
//! These never escape the seeding engine: a failed batch is logged and
//! counted, then its siblings proceed.

use thiserror::Error;

/// Result type for seeding operations
pub type SeedResult<T> = Result<T, SeedError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeedError {
    #[error("Table '{table}': cannot encode record {row}: {reason}")]
    Encode {
        table: String,
        row: usize,
        reason: String,
    },

    #[error("Table '{table}': batch insert failed: {reason}")]
    Insert { table: String, reason: String },

    #[error("Seed worker failed: {0}")]
    Worker(String),
}

impl SeedError {
    pub fn code(&self) -> &'static str {
        match self {
            SeedError::Encode { .. } => "SMILE_SEED_ENCODE",
            SeedError::Insert { .. } => "SMILE_SEED_INSERT",
            SeedError::Worker(_) => "SMILE_SEED_WORKER",
        }
    }
}
