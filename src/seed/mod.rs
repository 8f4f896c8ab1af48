//! Seeding compiled tables from tabular sources
//!
//! For each source: load, convert to records, validate against the field
//! schema, then insert in fixed-size batches. A source that fails to load or
//! validate is skipped; a batch that fails to insert is counted. Each table
//! ends with one `SeedOutcome`.

mod engine;
mod errors;
mod outcome;
mod sink;

pub use engine::{SeedDataset, Seeder, DEFAULT_BATCH_SIZE};
pub use errors::{SeedError, SeedResult};
pub use outcome::{SeedOutcome, SeedReport};
pub use sink::RecordSink;
