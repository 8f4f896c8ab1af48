//! Experiments, stimuli and the build pipeline
//!
//! Every deployment has four meta tables (participants, sessions, blocks,
//! trials). Each experiment version adds `_experiment-<version>` for its
//! trial data and `_stimuli-<name>` for the dataset it draws from.
//!
//! `build` runs the whole pipeline:
//!
//! 1. resolve experiments and compile their tables (failures are per table)
//! 2. optionally write the DDL script
//! 3. recreate all tables in one deferred-foreign-key transaction
//! 4. seed every stimuli dataset concurrently

mod build;
mod definition;
mod errors;
mod resolver;

pub use build::{build, build_into, compile, BuildReport, TableFailure};
pub use definition::{
    experiment_table_name, is_valid_version, stimuli_table_name, ExperimentDef, SourcePatterns,
    StimuliDef, EXPERIMENT_TABLE_PREFIX, STIMULI_TABLE_PREFIX,
};
pub use errors::{BuildError, BuildResult};
pub use resolver::{compile_experiments, resolve_experiments, table_schemas, ResolvedExperiment, ResolvedStimuli};
