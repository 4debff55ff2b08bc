//! Discovery of migration sources in a directory.
//!
//! The loader lists a directory, keeps the entries whose file name matches
//! the naming filter, and parses each one. A source that fails to read or
//! parse is logged and skipped; it never stops the others from loading.

use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;

use crate::error::{Error, Result};

use super::{parse_file, Migration};

/// Default naming filter: a numeric prefix, an underscore, and `.sql`.
pub const DEFAULT_FILE_PATTERN: &str = r"^[0-9]{1,20}_.*\.sql$";

/// A source that was found but could not be turned into a unit.
#[derive(Debug)]
pub struct SourceFailure {
    /// Path of the failed source.
    pub path: PathBuf,
    /// Why it failed.
    pub error: Error,
}

/// Outcome of loading a directory.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Units parsed successfully, ordered by file name.
    pub migrations: Vec<Migration>,
    /// Sources that were skipped.
    pub failures: Vec<SourceFailure>,
}

impl LoadReport {
    /// Returns true if every matching source loaded.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Loads migration units from a directory.
///
/// # Examples
///
/// ```no_run
/// use mango::migration::MigrationLoader;
/// use std::path::Path;
///
/// let loader = MigrationLoader::default();
/// let report = loader.load_dir(Path::new("migrations")).unwrap();
/// for failure in &report.failures {
///     eprintln!("skipped {}: {}", failure.path.display(), failure.error);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct MigrationLoader {
    pattern: Regex,
}

impl MigrationLoader {
    /// Creates a loader that accepts file names matching `pattern`.
    ///
    /// # Errors
    ///
    /// Returns a validation error if `pattern` is not a valid regex.
    pub fn new(pattern: &str) -> Result<Self> {
        let pattern = Regex::new(pattern).map_err(|e| Error::Validation {
            field: "file_pattern".into(),
            message: format!("invalid regex '{pattern}': {e}"),
        })?;
        Ok(Self { pattern })
    }

    /// Whether a file name passes the naming filter.
    #[must_use]
    pub fn accepts(&self, file_name: &str) -> bool {
        self.pattern.is_match(file_name)
    }

    /// Parses every matching file in `dir`.
    ///
    /// Sub-directories and non-UTF-8 names are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error only if the directory itself cannot be listed.
    /// Failures of individual sources are collected in the report.
    pub fn load_dir(&self, dir: &Path) -> Result<LoadReport> {
        let entries = fs::read_dir(dir).map_err(|e| Error::InvalidPath {
            path: dir.to_path_buf(),
            reason: format!("cannot list migration directory: {e}"),
        })?;

        let mut candidates = Vec::new();
        for entry in entries {
            let entry = entry?;
            let path = entry.path();
            if path.is_dir() {
                continue;
            }
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                log::debug!("ignoring non UTF-8 entry {}", path.display());
                continue;
            };
            if self.accepts(file_name) {
                candidates.push(path);
            } else {
                log::debug!("ignoring {file_name}: does not match naming filter");
            }
        }
        candidates.sort();

        let mut report = LoadReport::default();
        for path in candidates {
            match parse_file(&path) {
                Ok(migration) => report.migrations.push(migration),
                Err(error) => {
                    log::warn!("skipping {}: {error}", path.display());
                    report.failures.push(SourceFailure { path, error });
                }
            }
        }

        log::info!(
            "loaded {} migration(s) from {} ({} skipped)",
            report.migrations.len(),
            dir.display(),
            report.failures.len()
        );
        Ok(report)
    }
}

impl Default for MigrationLoader {
    fn default() -> Self {
        Self {
            pattern: Regex::new(DEFAULT_FILE_PATTERN).expect("default file pattern is valid"),
        }
    }
}
