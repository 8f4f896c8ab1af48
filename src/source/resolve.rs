//! Glob resolution into lazy source handles

use std::collections::BTreeSet;
use std::env;
use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};

use super::errors::{SourceError, SourceResult};
use super::format::SourceFormat;
use super::frame::Frame;
use crate::observability::Logger;

const OS_METADATA: &[&str] = &[".DS_Store", "Thumbs.db", "desktop.ini"];

/// A lazy handle to one physical tabular file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSource {
    pub directory: PathBuf,
    pub filename: String,
    pub format: SourceFormat,
}

impl ResolvedSource {
    /// Wraps an absolute file path. Fails if no decoder matches its extension.
    pub fn from_path(path: &Path) -> SourceResult<Self> {
        let format = SourceFormat::from_path(path)?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let directory = path.parent().map(Path::to_path_buf).unwrap_or_default();

        Ok(Self {
            directory,
            filename,
            format,
        })
    }

    pub fn path(&self) -> PathBuf {
        self.directory.join(&self.filename)
    }

    /// Decodes the file on a blocking worker.
    pub async fn load(self) -> SourceResult<Frame> {
        let path = self.path();
        let format = self.format;
        tokio::task::spawn_blocking(move || format.decode(&path))
            .await
            .map_err(|e| SourceError::Worker(e.to_string()))?
    }
}

fn is_hidden_or_metadata(path: &Path) -> bool {
    path.file_name()
        .map(|n| n.to_string_lossy())
        .map(|n| n.starts_with('.') || OS_METADATA.contains(&n.as_ref()))
        .unwrap_or(true)
}

fn absolute(path: &Path) -> SourceResult<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = env::current_dir().map_err(|e| SourceError::io(path, e))?;
    Ok(cwd.join(path))
}

/// Resolves glob patterns under `base_dir` into sources.
///
/// Matches are files only, sorted and deduplicated across patterns. Hidden
/// entries are only matched when a pattern names them literally; OS metadata
/// files never are. Zero matches fail with `NoMatchingFiles` unless
/// `allow_empty` is set.
pub fn resolve_sources(
    dataset: &str,
    base_dir: &Path,
    patterns: &[String],
    allow_empty: bool,
) -> SourceResult<Vec<ResolvedSource>> {
    let base = absolute(base_dir)?;
    let options = MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: true,
    };

    let mut matched = BTreeSet::new();
    for raw in patterns {
        let full = if Path::new(raw).is_absolute() {
            raw.clone()
        } else {
            format!(
                "{}/{}",
                Pattern::escape(&base.to_string_lossy()),
                raw.trim_start_matches("./")
            )
        };

        let paths = glob::glob_with(&full, options).map_err(|e| SourceError::InvalidPattern {
            pattern: raw.clone(),
            reason: e.to_string(),
        })?;

        for entry in paths {
            match entry {
                Ok(path) if path.is_file() && !is_hidden_or_metadata(&path) => {
                    matched.insert(path);
                }
                Ok(_) => {}
                Err(e) => Logger::warn(
                    "SOURCE_ENTRY_UNREADABLE",
                    &[
                        ("dataset", dataset),
                        ("path", &e.path().display().to_string()),
                        ("reason", &e.error().to_string()),
                    ],
                ),
            }
        }
    }

    if matched.is_empty() && !allow_empty {
        return Err(SourceError::NoMatchingFiles {
            dataset: dataset.to_string(),
            base_dir: base.display().to_string(),
            patterns: patterns.to_vec(),
        });
    }

    let sources = matched
        .iter()
        .map(|path| ResolvedSource::from_path(path))
        .collect::<SourceResult<Vec<_>>>()?;

    let count = sources.len().to_string();
    Logger::debug("SOURCES_RESOLVED", &[("dataset", dataset), ("count", &count)]);
    Ok(sources)
}
