//! Embedded SQLite database
//!
//! Executes the DDL batch for all compiled tables and receives seeded
//! batches as a `RecordSink`.

mod connection;
mod errors;

pub use connection::Database;
pub use errors::{DatabaseError, DatabaseResult};
