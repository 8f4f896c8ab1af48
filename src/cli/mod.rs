//! CLI module for smiledb
//!
//! Provides command-line interface for:
//! - compile: Print (and optionally write) the DDL script
//! - tables: Print the compiled table models
//! - build: Recreate the database and seed stimuli

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{build, compile, run, run_command, tables};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{write_response, write_text};
