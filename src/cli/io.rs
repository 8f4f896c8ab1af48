//! Output handling for the CLI
//!
//! JSON results go to stdout as a single `{"status": "ok", "data": ...}`
//! object. The DDL script is written as plain text.

use std::io::{self, Write};

use serde::Serialize;
use serde_json::json;

use super::errors::CliResult;

/// Write a success response to stdout
pub fn write_response<T: Serialize>(data: &T) -> CliResult<()> {
    let response = json!({
        "status": "ok",
        "data": data
    });

    let mut stdout = io::stdout();
    serde_json::to_writer_pretty(&mut stdout, &response)?;
    writeln!(stdout)?;
    stdout.flush()?;

    Ok(())
}

/// Write raw text to stdout
pub fn write_text(text: &str) -> CliResult<()> {
    let mut stdout = io::stdout();
    write!(stdout, "{}", text)?;
    stdout.flush()?;

    Ok(())
}
