//! smiledb - declarative experiment schemas compiled into SQLite tables
//!
//! Field schemas are compiled into `Table` models, rendered as DDL, created in
//! an embedded SQLite database and seeded from CSV, TSV, JSON-lines and
//! Parquet files.

pub mod builder;
pub mod cli;
pub mod config;
pub mod database;
pub mod experiment;
pub mod observability;
pub mod schema;
pub mod seed;
pub mod source;
pub mod sql;
pub mod table;
