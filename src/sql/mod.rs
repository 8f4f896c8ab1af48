//! SQL generation for the embedded SQLite engine

pub mod ddl;
pub mod dialect;

pub use ddl::{create_indexes, create_table, drop_table_if_exists, render_script, table_statements, write_script};
pub use dialect::{escape_identifier, mapping, sql_type, CodecError, ColumnCodec, SqlType, TypeMapping};
