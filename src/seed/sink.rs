//! Insert target for seeded batches

use async_trait::async_trait;

use super::errors::SeedResult;
use crate::builder::TableDefinition;
use crate::schema::Record;

/// Anything that can insert a batch of validated records into a table.
///
/// A batch is all-or-nothing: on error no record of it is stored.
#[async_trait]
pub trait RecordSink: Send + Sync {
    /// Inserts `records` and returns how many rows were written.
    async fn insert_batch(&self, table: &TableDefinition, records: &[Record]) -> SeedResult<usize>;
}
