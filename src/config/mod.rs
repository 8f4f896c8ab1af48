//! Project configuration
//!
//! A single JSON document. Relative `root_dir` is resolved against the
//! directory holding the config file; every other relative path is resolved
//! against `root_dir`.
//!
//! ```json
//! {
//!   "database_path": ".smile/database/smile.db",
//!   "experiments": {
//!     "v1": {
//!       "schema": { "trial": { "type": "number", "tags": ["trialID"] } },
//!       "stimuli": { "name": "words", "source": "words/*.csv", "schema": { ... } }
//!     }
//!   }
//! }
//! ```

mod errors;

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub use errors::{ConfigError, ConfigResult};

use crate::experiment::ExperimentDef;
use crate::observability::Severity;
use crate::seed::DEFAULT_BATCH_SIZE;

/// smiledb configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Project root (default: ".")
    #[serde(default = "default_root_dir")]
    pub root_dir: PathBuf,

    /// SQLite file (default: ".smile/database/smile.db")
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    /// Base directory for stimuli patterns (default: "<root_dir>/stimuli")
    #[serde(default)]
    pub stimuli_dir: Option<PathBuf>,

    /// Where to write the generated DDL script, if anywhere
    #[serde(default)]
    pub sql_output: Option<PathBuf>,

    /// Minimum log severity (default: "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Rows per insert batch (default: 100)
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Experiment definitions keyed by version, in file order
    #[serde(default)]
    pub experiments: IndexMap<String, ExperimentDef>,
}

fn default_root_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_database_path() -> PathBuf {
    PathBuf::from(".smile/database/smile.db")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root_dir: default_root_dir(),
            database_path: default_database_path(),
            stimuli_dir: None,
            sql_output: None,
            log_level: default_log_level(),
            batch_size: default_batch_size(),
            experiments: IndexMap::new(),
        }
    }
}

impl Config {
    /// Reads, parses and validates a config file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let raw = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let mut config = Self::from_json(&raw).map_err(|e| match e {
            ConfigError::Parse { reason, .. } => ConfigError::Parse {
                path: path.display().to_string(),
                reason,
            },
            other => other,
        })?;

        if config.root_dir.is_relative() {
            let base = path.parent().unwrap_or_else(|| Path::new("."));
            config.root_dir = base.join(&config.root_dir);
        }
        Ok(config)
    }

    /// Parses and validates a config document.
    pub fn from_json(raw: &str) -> ConfigResult<Self> {
        let config: Config = serde_json::from_str(raw).map_err(|e| ConfigError::Parse {
            path: "<inline>".to_string(),
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        self.severity()?;

        if self.batch_size == 0 {
            return Err(ConfigError::Invalid("batch_size must be at least 1".into()));
        }

        for (version, experiment) in &self.experiments {
            let stimuli = &experiment.stimuli;
            if stimuli.name.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "experiment '{}': stimuli name must not be empty",
                    version
                )));
            }
            if stimuli.source.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "experiment '{}': stimuli '{}' has no source pattern",
                    version, stimuli.name
                )));
            }
        }
        Ok(())
    }

    pub fn severity(&self) -> ConfigResult<Severity> {
        self.log_level.parse().map_err(ConfigError::Invalid)
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root_dir.join(path)
        }
    }

    pub fn database_path(&self) -> PathBuf {
        self.resolve(&self.database_path)
    }

    pub fn stimuli_dir(&self) -> PathBuf {
        match &self.stimuli_dir {
            Some(dir) => self.resolve(dir),
            None => self.root_dir.join("stimuli"),
        }
    }

    pub fn sql_output(&self) -> Option<PathBuf> {
        self.sql_output.as_deref().map(|p| self.resolve(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const MINIMAL: &str = r#"{
        "experiments": {
            "v1": {
                "schema": { "trial": { "type": "number", "tags": ["trialID"] } },
                "stimuli": { "name": "words", "source": "*.csv", "schema": {} }
            }
        }
    }"#;

    #[test]
    fn test_defaults() {
        let config = Config::from_json("{}").unwrap();
        assert_eq!(config.root_dir, PathBuf::from("."));
        assert_eq!(config.database_path(), PathBuf::from("./.smile/database/smile.db"));
        assert_eq!(config.stimuli_dir(), PathBuf::from("./stimuli"));
        assert_eq!(config.sql_output(), None);
        assert_eq!(config.severity().unwrap(), Severity::Info);
        assert_eq!(config.batch_size, DEFAULT_BATCH_SIZE);
    }

    #[test]
    fn test_experiments_keep_file_order() {
        let raw = r#"{"experiments": {
            "zeta": {"stimuli": {"name": "a", "source": "a.csv"}},
            "alpha": {"stimuli": {"name": "b", "source": "b.csv"}}
        }}"#;
        let config = Config::from_json(raw).unwrap();
        let versions: Vec<_> = config.experiments.keys().cloned().collect();
        assert_eq!(versions, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_load_resolves_root_against_config_dir() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("smile.json");
        fs::write(&path, MINIMAL).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.root_dir, dir.path().join("."));
        assert_eq!(config.stimuli_dir(), dir.path().join(".").join("stimuli"));
        assert_eq!(config.experiments["v1"].stimuli.name, "words");
    }

    #[test]
    fn test_invalid_documents() {
        assert_eq!(
            Config::from_json(r#"{"log_level": "loud"}"#).unwrap_err().code(),
            "SMILE_CONFIG_INVALID"
        );
        assert_eq!(
            Config::from_json(r#"{"batch_size": 0}"#).unwrap_err().code(),
            "SMILE_CONFIG_INVALID"
        );
        let no_source = r#"{"experiments": {"v1": {"stimuli": {"name": "w", "source": []}}}}"#;
        assert!(Config::from_json(no_source).is_err());
        assert_eq!(Config::from_json("{").unwrap_err().code(), "SMILE_CONFIG_PARSE");
    }

    #[test]
    fn test_missing_file() {
        let err = Config::load(Path::new("/nonexistent/smile.json")).unwrap_err();
        assert_eq!(err.code(), "SMILE_CONFIG_READ");
    }
}
