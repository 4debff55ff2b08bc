//! Configuration schema definitions.
//!
//! Every field is optional so that partial files and environment overrides
//! can be layered; [`Config::with_defaults`] supplies the built-in values.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::database::DEFAULT_TABLE;
use crate::error::{Error, Result};
use crate::migration::DEFAULT_FILE_PATTERN;
use crate::operations::RunOptions;
use crate::reconcile::ReconcileOptions;

/// Default directory scanned for migration sources.
pub const DEFAULT_MIGRATIONS_DIR: &str = "migrations";

/// Default time to wait on a locked database, in seconds.
pub const DEFAULT_BUSY_TIMEOUT_SECONDS: u64 = 5;

/// Complete configuration structure.
///
/// # Examples
///
/// ```
/// use mango::config::Config;
/// use std::path::Path;
///
/// let config = Config {
///     database: Some("app.db".into()),
///     ..Config::with_defaults()
/// };
/// assert_eq!(config.database_path().unwrap(), Path::new("app.db"));
/// assert_eq!(config.table(), "mango_db_versions");
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Path of the SQLite database to migrate.
    pub database: Option<PathBuf>,

    /// Directory containing migration sources.
    pub migrations_dir: Option<PathBuf>,

    /// Regular expression a file name must match to be loaded.
    pub file_pattern: Option<String>,

    /// Name of the ledger table.
    pub table: Option<String>,

    /// Apply unapplied dependencies of a requested migration first.
    pub auto_apply_prerequisites: Option<bool>,

    /// Fail when the ledger records a migration with no source file.
    pub strict_orphans: Option<bool>,

    /// Time to wait on a locked database (seconds).
    pub busy_timeout_seconds: Option<u64>,
}

impl Config {
    /// Built-in defaults. `database` has no default.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            database: None,
            migrations_dir: Some(PathBuf::from(DEFAULT_MIGRATIONS_DIR)),
            file_pattern: Some(DEFAULT_FILE_PATTERN.to_string()),
            table: Some(DEFAULT_TABLE.to_string()),
            auto_apply_prerequisites: Some(true),
            strict_orphans: Some(false),
            busy_timeout_seconds: Some(DEFAULT_BUSY_TIMEOUT_SECONDS),
        }
    }

    /// The database path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingConfiguration`] if no database was configured.
    pub fn database_path(&self) -> Result<&Path> {
        self.database
            .as_deref()
            .ok_or_else(|| Error::MissingConfiguration {
                field: "database".into(),
            })
    }

    /// The migrations directory.
    #[must_use]
    pub fn migrations_dir(&self) -> &Path {
        self.migrations_dir
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_MIGRATIONS_DIR))
    }

    /// The file name filter.
    #[must_use]
    pub fn file_pattern(&self) -> &str {
        self.file_pattern.as_deref().unwrap_or(DEFAULT_FILE_PATTERN)
    }

    /// The ledger table name.
    #[must_use]
    pub fn table(&self) -> &str {
        self.table.as_deref().unwrap_or(DEFAULT_TABLE)
    }

    /// The busy timeout.
    #[must_use]
    pub fn busy_timeout(&self) -> Duration {
        Duration::from_secs(
            self.busy_timeout_seconds
                .unwrap_or(DEFAULT_BUSY_TIMEOUT_SECONDS),
        )
    }

    /// Options for reconciling sources with the ledger.
    #[must_use]
    pub fn reconcile_options(&self) -> ReconcileOptions {
        ReconcileOptions {
            strict_orphans: self.strict_orphans.unwrap_or(false),
        }
    }

    /// Options for the executor. Dry-run is never configured from files.
    #[must_use]
    pub fn run_options(&self) -> RunOptions {
        RunOptions::default()
            .with_auto_apply_prerequisites(self.auto_apply_prerequisites.unwrap_or(true))
    }

    /// Resolves relative paths against `base`, the directory of the file
    /// this configuration was read from.
    pub(crate) fn resolve_paths(&mut self, base: &Path) {
        for path in [&mut self.database, &mut self.migrations_dir]
            .into_iter()
            .flatten()
        {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}
