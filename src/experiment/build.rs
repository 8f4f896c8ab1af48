//! The build pipeline: compile, initialize the database, seed

use std::path::PathBuf;

use serde::Serialize;

use super::errors::{BuildError, BuildResult};
use super::resolver::{compile_experiments, resolve_experiments, ResolvedExperiment};
use crate::config::Config;
use crate::database::Database;
use crate::observability::{Logger, ObservationScope};
use crate::seed::{SeedDataset, SeedReport, Seeder};
use crate::sql::write_script;
use crate::table::{CompileError, CompiledTables};

/// A table or dataset that dropped out of the build, and why
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableFailure {
    pub table: String,
    pub code: String,
    pub message: String,
}

impl From<&CompileError> for TableFailure {
    fn from(err: &CompileError) -> Self {
        Self {
            table: err.table().to_string(),
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }
}

/// Everything a build did
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildReport {
    pub tables: Vec<String>,
    pub compile_failures: Vec<TableFailure>,
    pub statements: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sql_output: Option<PathBuf>,
    pub seeded: Vec<SeedReport>,
    pub unseeded: Vec<TableFailure>,
}

impl BuildReport {
    /// No table failed to compile and every seeded table fully succeeded.
    pub fn is_clean(&self) -> bool {
        self.compile_failures.is_empty()
            && self.unseeded.is_empty()
            && self.seeded.iter().all(|r| r.outcome.is_success())
    }
}

/// Resolves and compiles every table named by the config.
pub fn compile(config: &Config) -> (Vec<ResolvedExperiment>, CompiledTables) {
    let scope = ObservationScope::new("COMPILE");
    let experiments = resolve_experiments(&config.experiments, &config.stimuli_dir());
    let compiled = compile_experiments(&experiments);

    scope.complete_with_fields(&[
        ("tables", &compiled.tables.len().to_string()),
        ("failures", &compiled.failures.len().to_string()),
    ]);
    (experiments, compiled)
}

/// Opens the configured database and builds into it.
pub async fn build(config: &Config) -> BuildResult<BuildReport> {
    let database = Database::open(&config.database_path())?;
    build_into(config, &database).await
}

/// Compiles all tables, recreates them in `database`, then seeds every
/// stimuli dataset whose table compiled and whose sources resolved.
pub async fn build_into(config: &Config, database: &Database) -> BuildResult<BuildReport> {
    let (experiments, compiled) = compile(config);
    let mut report = BuildReport {
        tables: compiled.tables.iter().map(|t| t.name.clone()).collect(),
        compile_failures: compiled.failures.iter().map(TableFailure::from).collect(),
        ..BuildReport::default()
    };

    if let Some(path) = config.sql_output() {
        write_script(&path, &compiled.tables).map_err(|e| BuildError::Script {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Logger::info("SQL_SCRIPT_WRITTEN", &[("path", &path.display().to_string())]);
        report.sql_output = Some(path);
    }

    report.statements = database.initialize(&compiled.tables).await?;

    let mut datasets = Vec::new();
    for experiment in experiments {
        let stimuli = experiment.stimuli;
        let Some(table) = compiled.get(&stimuli.table_name) else {
            continue;
        };
        if datasets.iter().any(|d: &SeedDataset| d.table.name == table.name) {
            continue;
        }
        match stimuli.sources {
            Ok(sources) => datasets.push(SeedDataset {
                table: table.clone(),
                schema: stimuli.schema,
                sources,
            }),
            Err(e) => report.unseeded.push(TableFailure {
                table: stimuli.table_name,
                code: e.code().to_string(),
                message: e.to_string(),
            }),
        }
    }

    let scope = ObservationScope::with_fields("SEED", &[("datasets", &datasets.len().to_string())]);
    report.seeded = Seeder::new(database)
        .with_batch_size(config.batch_size)
        .seed_all(datasets)
        .await;
    let inserted: usize = report.seeded.iter().map(|r| r.outcome.inserted()).sum();
    scope.complete_with_fields(&[("inserted", &inserted.to_string())]);

    Ok(report)
}
