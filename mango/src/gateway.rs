//! Seams between the migration engine and the database it drives.
//!
//! The engine never talks to a database directly. It runs statement text
//! through a [`StatementExecutor`] and keeps its bookkeeping in a
//! [`MigrationStore`] (the ledger). [`crate::Database`] implements both for
//! SQLite; tests substitute their own implementations.

use crate::error::Result;
use crate::migration::Migration;

/// Runs migration bodies against the target database.
#[cfg_attr(test, mockall::automock)]
pub trait StatementExecutor {
    /// Executes one body; it may contain several statements.
    ///
    /// # Errors
    ///
    /// Returns the database's error if any statement fails.
    fn execute(&mut self, statement: &str) -> Result<()>;
}

/// Persists the applied state of migration units.
#[cfg_attr(test, mockall::automock)]
pub trait MigrationStore {
    /// Whether the ledger table exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be queried.
    fn table_exists(&self) -> Result<bool>;

    /// Creates the ledger table.
    ///
    /// # Errors
    ///
    /// Returns an error if the table cannot be created.
    fn create_table(&mut self) -> Result<()>;

    /// Reads every recorded unit.
    ///
    /// # Errors
    ///
    /// Returns an error if the records cannot be read or decoded.
    fn list_records(&self) -> Result<Vec<Migration>>;

    /// Inserts or replaces the record for `migration`.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be written.
    fn upsert_record(&mut self, migration: &Migration) -> Result<()>;
}

/// Creates the ledger table if it does not exist yet.
///
/// Returns true if the table was created.
///
/// # Errors
///
/// Returns any error from the store.
pub fn ensure_ledger<S: MigrationStore + ?Sized>(store: &mut S) -> Result<bool> {
    if store.table_exists()? {
        log::debug!("ledger table exists, reading recorded migrations");
        return Ok(false);
    }
    log::info!("no ledger table found, creating");
    store.create_table()?;
    Ok(true)
}
