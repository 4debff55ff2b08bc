//! Shared test utilities for database unit tests.

use tempfile::tempdir;

use crate::database::{Database, DatabaseConfig};
use crate::migration::Migration;

/// Creates a temporary test database that will be cleaned up automatically.
///
/// # Panics
///
/// Panics if the temporary directory or database cannot be created.
#[must_use]
pub fn create_test_database() -> Database {
    let dir = tempdir().unwrap();
    let path = dir.path().join("test.db");
    let db = Database::open(DatabaseConfig::new(path)).unwrap();

    // Prevent the TempDir from being dropped immediately
    std::mem::forget(dir);

    db
}

/// Creates an unapplied unit with simple bodies and the given requirements.
///
/// # Panics
///
/// Panics if `identity` is empty.
#[must_use]
pub fn sample_migration(identity: &str, requires: &[&str]) -> Migration {
    Migration::builder(identity)
        .required_identities(requires.iter().map(|s| (*s).to_string()).collect())
        .up_body(format!("-- up {identity}\n"))
        .down_body(format!("-- down {identity}\n"))
        .build()
        .unwrap()
}
