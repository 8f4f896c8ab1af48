//! CLI command implementations

use std::path::Path;

use serde_json::json;

use crate::config::Config;
use crate::experiment::{self, TableFailure};
use crate::observability::Logger;
use crate::sql::{render_script, write_script};

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::{write_response, write_text};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Compile { config } => compile(&config),
        Command::Tables { config } => tables(&config),
        Command::Build { config } => build(&config),
    }
}

/// Loads the config and applies its log level.
fn load_config(path: &Path) -> CliResult<Config> {
    let config = Config::load(path)?;
    Logger::set_min_severity(config.severity()?);
    Ok(config)
}

/// Compile every table and print the DDL script
///
/// The script is also written to `sql_output` when configured. Any table
/// that fails to compile makes the command fail after the script of the
/// remaining tables is printed.
pub fn compile(config_path: &Path) -> CliResult<()> {
    let config = load_config(config_path)?;
    let (_, compiled) = experiment::compile(&config);

    if let Some(path) = config.sql_output() {
        write_script(&path, &compiled.tables)
            .map_err(|e| CliError::io_error(format!("Failed to write {}: {}", path.display(), e)))?;
    }
    write_text(&render_script(&compiled.tables))?;

    if !compiled.is_complete() {
        let failures: Vec<TableFailure> = compiled.failures.iter().map(TableFailure::from).collect();
        return Err(CliError::compile_failed(&failures));
    }
    Ok(())
}

/// Print the compiled table models as JSON
pub fn tables(config_path: &Path) -> CliResult<()> {
    let config = load_config(config_path)?;
    let (_, compiled) = experiment::compile(&config);

    let failures: Vec<TableFailure> = compiled.failures.iter().map(TableFailure::from).collect();
    write_response(&json!({
        "tables": compiled.tables,
        "failures": failures,
    }))?;

    if !failures.is_empty() {
        return Err(CliError::compile_failed(&failures));
    }
    Ok(())
}

/// Compile, recreate the database and seed every stimuli dataset
///
/// Prints the build report. Seeding problems are reported, not fatal;
/// compile failures and a failed DDL batch are.
pub fn build(config_path: &Path) -> CliResult<()> {
    let config = load_config(config_path)?;

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::runtime_failed(format!("Failed to create tokio runtime: {}", e)))?;
    let report = rt.block_on(experiment::build(&config))?;

    write_response(&report)?;

    if !report.compile_failures.is_empty() {
        return Err(CliError::compile_failed(&report.compile_failures));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_config(dir: &Path, experiments: &str) -> std::path::PathBuf {
        let path = dir.join("smile.json");
        let raw = format!(
            r#"{{"log_level": "error", "sql_output": "out/tables.sql", "experiments": {}}}"#,
            experiments
        );
        fs::write(&path, raw).unwrap();
        path
    }

    const VALID: &str = r#"{
        "v1": {
            "schema": { "trial": { "type": "number", "tags": ["trialID"] } },
            "stimuli": { "name": "words", "source": "*.csv", "allow_empty": true,
                         "schema": { "item": { "type": "number", "tags": ["trialID"] } } }
        }
    }"#;

    #[test]
    fn test_compile_writes_script() {
        let dir = TempDir::new().unwrap();
        let config = write_config(dir.path(), VALID);

        compile(&config).unwrap();
        let script = fs::read_to_string(dir.path().join("out/tables.sql")).unwrap();
        assert!(script.contains("DROP TABLE IF EXISTS \"participants\";"));
        assert!(script.contains("CREATE TABLE \"_stimuli-words\""));
    }

    #[test]
    fn test_compile_reports_failed_tables() {
        let dir = TempDir::new().unwrap();
        let broken = r#"{
            "v1": {
                "schema": { "a": { "type": "number", "tags": ["trialID"] },
                            "b": { "type": "number", "tags": ["trialID"] } },
                "stimuli": { "name": "words", "source": "*.csv", "allow_empty": true,
                             "schema": { "item": { "type": "number", "tags": ["trialID"] } } }
            }
        }"#;
        let config = write_config(dir.path(), broken);

        let err = compile(&config).unwrap_err();
        assert_eq!(err.code_str(), "SMILE_CLI_COMPILE_FAILED");
        assert!(err.message().contains("_experiment-v1 (SMILE_MULTIPLE_TRIAL_ID)"));
    }

    #[test]
    fn test_build_creates_database() {
        let dir = TempDir::new().unwrap();
        let config = write_config(dir.path(), VALID);

        build(&config).unwrap();
        assert!(dir.path().join(".smile/database/smile.db").exists());
    }

    #[test]
    fn test_missing_config() {
        let err = tables(Path::new("/nonexistent/smile.json")).unwrap_err();
        assert_eq!(err.code_str(), "SMILE_CLI_CONFIG_ERROR");
    }
}
