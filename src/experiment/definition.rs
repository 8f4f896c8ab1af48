//! Experiment and stimuli definitions as written in the config file

use std::sync::OnceLock;

use convert_case::{Case, Casing};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::schema::ObjectSchema;

pub const EXPERIMENT_TABLE_PREFIX: &str = "_experiment";
pub const STIMULI_TABLE_PREFIX: &str = "_stimuli";

/// One glob pattern or a list of them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SourcePatterns {
    One(String),
    Many(Vec<String>),
}

impl SourcePatterns {
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            SourcePatterns::One(pattern) => vec![pattern.clone()],
            SourcePatterns::Many(patterns) => patterns.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            SourcePatterns::One(pattern) => pattern.trim().is_empty(),
            SourcePatterns::Many(patterns) => patterns.iter().all(|p| p.trim().is_empty()),
        }
    }
}

/// A stimuli dataset: a table schema plus the files that seed it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StimuliDef {
    pub name: String,
    pub source: SourcePatterns,
    #[serde(default)]
    pub schema: ObjectSchema,
    /// Resolving zero files is not an error
    #[serde(default)]
    pub allow_empty: bool,
}

impl StimuliDef {
    pub fn table_name(&self) -> String {
        stimuli_table_name(&self.name)
    }
}

/// One experiment version
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentDef {
    /// Schema of the experiment's trial table
    #[serde(default)]
    pub schema: ObjectSchema,
    pub stimuli: StimuliDef,
}

/// `_experiment-<version>`
pub fn experiment_table_name(version: &str) -> String {
    format!("{}-{}", EXPERIMENT_TABLE_PREFIX, version)
}

/// `_stimuli-<kebab-case name>`
pub fn stimuli_table_name(name: &str) -> String {
    format!("{}-{}", STIMULI_TABLE_PREFIX, name.to_case(Case::Kebab))
}

fn version_pattern() -> &'static Regex {
    static VERSION: OnceLock<Regex> = OnceLock::new();
    VERSION.get_or_init(|| Regex::new(r"(?i)^[a-z_][\w-]+$").expect("static version pattern"))
}

/// Versions are identifiers that may also contain `-`.
pub fn is_valid_version(version: &str) -> bool {
    version_pattern().is_match(version)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_names() {
        assert_eq!(experiment_table_name("v1"), "_experiment-v1");
        assert_eq!(stimuli_table_name("stroopWords"), "_stimuli-stroop-words");
        assert_eq!(stimuli_table_name("silly rabbit"), "_stimuli-silly-rabbit");
    }

    #[test]
    fn test_version_validation() {
        assert!(is_valid_version("v1"));
        assert!(is_valid_version("Pilot_2-b"));
        assert!(is_valid_version("_draft"));
        assert!(!is_valid_version("1st"));
        assert!(!is_valid_version("v"));
        assert!(!is_valid_version("v 2"));
        assert!(!is_valid_version("v.2"));
    }

    #[test]
    fn test_source_patterns_accept_string_or_list() {
        let one: SourcePatterns = serde_json::from_str("\"words.csv\"").unwrap();
        let many: SourcePatterns = serde_json::from_str("[\"a.csv\", \"b/*.tsv\"]").unwrap();
        assert_eq!(one.to_vec(), vec!["words.csv"]);
        assert_eq!(many.to_vec(), vec!["a.csv", "b/*.tsv"]);
        assert!(SourcePatterns::Many(vec![]).is_empty());
    }

    #[test]
    fn test_stimuli_defaults() {
        let def: StimuliDef = serde_json::from_str(r#"{"name": "words", "source": "*.csv"}"#).unwrap();
        assert!(!def.allow_empty);
        assert!(def.schema.is_empty());
        assert_eq!(def.table_name(), "_stimuli-words");
    }
}
