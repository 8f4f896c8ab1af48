//! Table model and schema compilation
//!
//! Object schemas are normalized into `Table` values, then validated.
//! Failures are per table: a run compiles every table it can and reports the
//! rest.

mod compile;
mod errors;
pub mod meta;
mod model;
mod normalizer;
mod validator;

pub use compile::{compile_table, compile_tables, CompiledTables};
pub use errors::{CompileError, CompileResult};
pub use model::{Column, ColumnConstraints, ColumnType, CompositeKeys, Index, Table};
pub use normalizer::{normalize, RESERVED_FIELDS};
pub use validator::validate_table;
