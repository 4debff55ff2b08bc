//! Common test utilities for CLI integration tests.
//!
//! This module provides shared helpers for CLI testing, including:
//! - Test environment setup with temporary directories
//! - Command builder helpers for common patterns
//! - Direct inspection of the target database

use assert_cmd::Command;
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// The two-file layout used throughout the CLI tests.
#[allow(dead_code)]
pub const INIT_SQL: &str = "--mango up\nCREATE TABLE t(id int);\n--mango down\nDROP TABLE t;\n";
#[allow(dead_code)]
pub const ADD_SQL: &str =
    "--mango requires 001_init.sql\n--mango up\nALTER TABLE t ADD COLUMN x int;\n--mango down\nALTER TABLE t DROP COLUMN x;\n";

/// Test environment with an isolated project directory.
///
/// The project holds a `migrations/` directory; the database lives at
/// `app.db` next to it. `HOME` points into the temporary directory so no
/// user configuration leaks into the tests.
pub struct TestEnv {
    /// Temporary directory (kept alive for the duration of the test)
    #[allow(dead_code)]
    temp_dir: TempDir,
    /// Path to the temporary directory
    pub temp_path: PathBuf,
}

#[allow(dead_code)]
impl TestEnv {
    /// Create an empty project.
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let temp_path = temp_dir.path().to_path_buf();
        std::fs::create_dir(temp_path.join("migrations")).expect("Failed to create migrations");

        Self {
            temp_dir,
            temp_path,
        }
    }

    /// Create a project holding `001_init.sql` and `002_add.sql`.
    pub fn with_init_and_add() -> Self {
        let env = Self::new();
        env.write_migration("001_init.sql", INIT_SQL);
        env.write_migration("002_add.sql", ADD_SQL);
        env
    }

    /// Get a bare command builder without pre-configured flags.
    ///
    /// The command runs inside the project directory with a clean
    /// environment, so tests control every flag themselves.
    pub fn command_bare(&self) -> Command {
        let mut cmd = Command::cargo_bin("mango").expect("Failed to find mango binary");
        cmd.current_dir(&self.temp_path)
            .env("HOME", &self.temp_path)
            .env_remove("MANGO_CONFIG")
            .env_remove("MANGO_DATABASE")
            .env_remove("MANGO_MIGRATIONS_DIR")
            .env_remove("MANGO_FILE_PATTERN")
            .env_remove("MANGO_TABLE")
            .env_remove("MANGO_AUTO_APPLY_PREREQUISITES")
            .env_remove("MANGO_STRICT_ORPHANS")
            .env_remove("MANGO_BUSY_TIMEOUT_SECONDS")
            .env_remove("MANGO_LOG_MODE")
            .env_remove("MANGO_OUTPUT_FORMAT");
        cmd
    }

    /// Get a command builder with the database and directory pre-configured.
    pub fn command(&self) -> Command {
        let mut cmd = self.command_bare();
        cmd.arg("--db")
            .arg(self.database_path())
            .arg("--dir")
            .arg(self.migrations_dir());
        cmd
    }

    /// Get the temp path.
    pub fn path(&self) -> &Path {
        &self.temp_path
    }

    pub fn migrations_dir(&self) -> PathBuf {
        self.temp_path.join("migrations")
    }

    pub fn database_path(&self) -> PathBuf {
        self.temp_path.join("app.db")
    }

    /// Write (or overwrite) a migration source.
    pub fn write_migration(&self, name: &str, contents: &str) {
        std::fs::write(self.migrations_dir().join(name), contents)
            .expect("Failed to write migration");
    }

    /// Remove a migration source.
    pub fn remove_migration(&self, name: &str) {
        std::fs::remove_file(self.migrations_dir().join(name)).expect("Failed to remove migration");
    }

    /// Write `mango.yaml` at the project root.
    pub fn write_project_config(&self, yaml: &str) {
        std::fs::write(self.temp_path.join("mango.yaml"), yaml).expect("Failed to write config");
    }

    /// Run `mango up` for the given identities and assert success.
    pub fn up(&self, migrations: &[&str]) {
        self.command().arg("up").args(migrations).assert().success();
    }

    /// Open the project database directly.
    pub fn connection(&self) -> Connection {
        Connection::open(self.database_path()).expect("Failed to open database")
    }

    /// Whether the project database has a table with this name.
    pub fn has_table(&self, table: &str) -> bool {
        if !self.database_path().exists() {
            return false;
        }
        let count: i64 = self
            .connection()
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
                [table],
                |row| row.get(0),
            )
            .expect("Failed to query sqlite_master");
        count > 0
    }

    /// Identities recorded as applied in the default ledger, by identity.
    pub fn applied(&self) -> Vec<String> {
        let conn = self.connection();
        let mut stmt = conn
            .prepare("SELECT identity FROM mango_db_versions WHERE applied ORDER BY identity")
            .expect("Failed to prepare ledger query");
        stmt.query_map([], |row| row.get(0))
            .expect("Failed to query ledger")
            .collect::<Result<Vec<String>, _>>()
            .expect("Failed to read ledger")
    }
}
