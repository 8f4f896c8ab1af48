//! Resolving experiment definitions into tables and datasets

use std::path::Path;

use indexmap::IndexMap;

use super::definition::{experiment_table_name, is_valid_version, ExperimentDef};
use crate::observability::Logger;
use crate::schema::ObjectSchema;
use crate::source::{resolve_sources, ResolvedSource, SourceResult};
use crate::table::meta::meta_schemas;
use crate::table::{compile_tables, CompiledTables};

/// A stimuli dataset with its sources resolved
#[derive(Debug, Clone)]
pub struct ResolvedStimuli {
    pub name: String,
    pub table_name: String,
    pub schema: ObjectSchema,
    /// Resolution failure only stops this dataset's seeding
    pub sources: SourceResult<Vec<ResolvedSource>>,
}

#[derive(Debug, Clone)]
pub struct ResolvedExperiment {
    pub version: String,
    pub table_name: String,
    pub schema: ObjectSchema,
    pub stimuli: ResolvedStimuli,
}

/// Resolves every valid experiment version, in definition order.
///
/// Invalid versions are logged and skipped. Stimuli patterns are resolved
/// against `stimuli_dir`.
pub fn resolve_experiments(
    experiments: &IndexMap<String, ExperimentDef>,
    stimuli_dir: &Path,
) -> Vec<ResolvedExperiment> {
    experiments
        .iter()
        .filter(|(version, _)| {
            let valid = is_valid_version(version);
            if !valid {
                Logger::warn(
                    "EXPERIMENT_VERSION_INVALID",
                    &[
                        ("version", version.as_str()),
                        ("reason", "versions must be identifiers (`-` allowed); experiment ignored"),
                    ],
                );
            }
            valid
        })
        .map(|(version, def)| {
            let stimuli = &def.stimuli;
            let sources = resolve_sources(
                &stimuli.name,
                stimuli_dir,
                &stimuli.source.to_vec(),
                stimuli.allow_empty,
            );
            if let Err(e) = &sources {
                Logger::error(
                    "STIMULI_RESOLVE_FAILED",
                    &[
                        ("version", version.as_str()),
                        ("stimuli", stimuli.name.as_str()),
                        ("code", e.code()),
                        ("reason", &e.to_string()),
                    ],
                );
            }

            ResolvedExperiment {
                version: version.clone(),
                table_name: experiment_table_name(version),
                schema: def.schema.clone(),
                stimuli: ResolvedStimuli {
                    name: stimuli.name.clone(),
                    table_name: stimuli.table_name(),
                    schema: stimuli.schema.clone(),
                    sources,
                },
            }
        })
        .collect()
}

/// Every table schema of a deployment: meta tables, then each experiment
/// followed by its stimuli. Repeated table names keep their first schema.
pub fn table_schemas(experiments: &[ResolvedExperiment]) -> Vec<(String, ObjectSchema)> {
    let mut schemas: Vec<(String, ObjectSchema)> = meta_schemas()
        .into_iter()
        .map(|(name, schema)| (name.to_string(), schema))
        .collect();

    for experiment in experiments {
        let pairs = [
            (&experiment.table_name, &experiment.schema),
            (&experiment.stimuli.table_name, &experiment.stimuli.schema),
        ];
        for (name, schema) in pairs {
            if schemas.iter().any(|(existing, _)| existing == name) {
                Logger::warn(
                    "DUPLICATE_TABLE",
                    &[("table", name.as_str()), ("version", experiment.version.as_str())],
                );
                continue;
            }
            schemas.push((name.clone(), schema.clone()));
        }
    }
    schemas
}

/// Compiles the meta tables plus every resolved experiment.
pub fn compile_experiments(experiments: &[ResolvedExperiment]) -> CompiledTables {
    let schemas = table_schemas(experiments);
    compile_tables(schemas.iter().map(|(name, schema)| (name.as_str(), schema)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::experiment::{SourcePatterns, StimuliDef};
    use crate::schema::FieldSchema;
    use std::fs;
    use tempfile::TempDir;

    fn experiment(stimuli_name: &str, source: &str, allow_empty: bool) -> ExperimentDef {
        ExperimentDef {
            schema: ObjectSchema::new()
                .field("trial", FieldSchema::number().trial_id())
                .field("response", FieldSchema::text()),
            stimuli: StimuliDef {
                name: stimuli_name.into(),
                source: SourcePatterns::One(source.into()),
                schema: ObjectSchema::new()
                    .field("item", FieldSchema::number().trial_id())
                    .field("word", FieldSchema::text()),
                allow_empty,
            },
        }
    }

    #[test]
    fn test_invalid_versions_are_skipped() {
        let dir = TempDir::new().unwrap();
        let mut defs = IndexMap::new();
        defs.insert("v1".to_string(), experiment("words", "*.csv", true));
        defs.insert("2nd try".to_string(), experiment("words", "*.csv", true));

        let resolved = resolve_experiments(&defs, dir.path());
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].table_name, "_experiment-v1");
        assert_eq!(resolved[0].stimuli.table_name, "_stimuli-words");
    }

    #[test]
    fn test_resolution_failure_is_kept_per_dataset() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("words.csv"), "item,word\n1,red\n").unwrap();

        let mut defs = IndexMap::new();
        defs.insert("v1".to_string(), experiment("words", "*.csv", false));
        defs.insert("v2".to_string(), experiment("faces", "faces/*.parquet", false));

        let resolved = resolve_experiments(&defs, dir.path());
        assert_eq!(resolved[0].stimuli.sources.as_ref().unwrap().len(), 1);
        assert_eq!(
            resolved[1].stimuli.sources.as_ref().unwrap_err().code(),
            "SMILE_NO_MATCHING_FILES"
        );
    }

    #[test]
    fn test_compile_experiments_orders_tables() {
        let dir = TempDir::new().unwrap();
        let mut defs = IndexMap::new();
        defs.insert("v1".to_string(), experiment("words", "*.csv", true));
        defs.insert("v2".to_string(), experiment("words", "*.csv", true));

        let compiled = compile_experiments(&resolve_experiments(&defs, dir.path()));
        let names: Vec<_> = compiled.tables.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "participants",
                "sessions",
                "blocks",
                "trials",
                "_experiment-v1",
                "_stimuli-words",
                "_experiment-v2",
            ]
        );
        assert!(compiled.is_complete());
    }
}
