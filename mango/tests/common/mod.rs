//! Common test utilities for integration tests.
//!
//! Provides a migration directory fixture backed by a temporary directory
//! and helpers for inspecting the target database.

pub mod database;

use std::fs;
use std::path::{Path, PathBuf};

use mango::config::Config;
use mango::{Database, DatabaseConfig};
use tempfile::TempDir;

/// The two-file layout used throughout the scenarios.
#[allow(dead_code)]
pub const INIT_SQL: &str = "--mango up\nCREATE TABLE t(id int);\n--mango down\nDROP TABLE t;\n";
#[allow(dead_code)]
pub const ADD_SQL: &str =
    "--mango requires 001_init.sql\n--mango up\nALTER TABLE t ADD COLUMN x int;\n--mango down\nALTER TABLE t DROP COLUMN x;\n";

/// A temporary project: a migrations directory and a database path.
#[allow(dead_code)]
pub struct ProjectFixture {
    root: TempDir,
}

#[allow(dead_code)]
impl ProjectFixture {
    /// Creates an empty project with a `migrations/` directory.
    pub fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir(root.path().join("migrations")).unwrap();
        Self { root }
    }

    /// Creates a project holding `001_init.sql` and `002_add.sql`.
    pub fn with_init_and_add() -> Self {
        Self::new()
            .with_migration("001_init.sql", INIT_SQL)
            .with_migration("002_add.sql", ADD_SQL)
    }

    /// Adds a migration source.
    pub fn with_migration(self, name: &str, contents: &str) -> Self {
        self.write_migration(name, contents);
        self
    }

    /// Writes (or overwrites) a migration source.
    pub fn write_migration(&self, name: &str, contents: &str) {
        fs::write(self.migrations_dir().join(name), contents).unwrap();
    }

    /// Deletes a migration source.
    pub fn remove_migration(&self, name: &str) {
        fs::remove_file(self.migrations_dir().join(name)).unwrap();
    }

    pub fn root(&self) -> &Path {
        self.root.path()
    }

    pub fn migrations_dir(&self) -> PathBuf {
        self.root.path().join("migrations")
    }

    pub fn database_path(&self) -> PathBuf {
        self.root.path().join("app.db")
    }

    /// A configuration pointing at this project, with defaults elsewhere.
    pub fn config(&self) -> Config {
        Config {
            database: Some(self.database_path()),
            migrations_dir: Some(self.migrations_dir()),
            ..Config::with_defaults()
        }
    }

    /// Opens the project database directly.
    pub fn open_database(&self) -> Database {
        Database::open(DatabaseConfig::new(self.database_path())).unwrap()
    }
}
