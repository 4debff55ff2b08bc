//! Database configuration and connection parameters.

use std::path::{Path, PathBuf};
use std::time::Duration;

use super::schema::DEFAULT_TABLE;

/// Configuration for the target database connection.
///
/// # Examples
///
/// ```
/// use mango::database::DatabaseConfig;
/// use std::time::Duration;
///
/// let config = DatabaseConfig::new("/tmp/app.db")
///     .with_busy_timeout(Duration::from_secs(10))
///     .with_table("schema_ledger");
/// assert_eq!(config.table, "schema_ledger");
/// ```
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Path to the database file.
    pub path: PathBuf,
    /// Busy timeout for database lock contention.
    pub busy_timeout: Duration,
    /// Name of the ledger table.
    pub table: String,
    /// Whether to create the database file if it doesn't exist.
    pub auto_create: bool,
    /// Whether to open the database in read-only mode.
    pub read_only: bool,
}

impl DatabaseConfig {
    /// Creates a new database configuration with default settings.
    ///
    /// Default settings:
    /// - `busy_timeout`: 5000ms
    /// - `table`: `mango_db_versions`
    /// - `auto_create`: true
    /// - `read_only`: false
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            busy_timeout: Duration::from_millis(5000),
            table: DEFAULT_TABLE.to_string(),
            auto_create: true,
            read_only: false,
        }
    }

    /// Sets the busy timeout duration.
    #[must_use]
    pub fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    /// Sets the ledger table name.
    ///
    /// The name is formatted into SQL; callers validate it first (see
    /// [`crate::config::ConfigValidator`]).
    #[must_use]
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    /// Opens the database in read-only mode; disables `auto_create`.
    #[must_use]
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self.auto_create = false;
        self
    }
}
