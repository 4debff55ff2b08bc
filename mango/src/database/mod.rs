//! `SQLite` adapter for the migration engine.
//!
//! [`Database`] implements both [`crate::gateway::StatementExecutor`] (running
//! migration bodies with `execute_batch`) and [`crate::gateway::MigrationStore`]
//! (the ledger table, `mango_db_versions` by default).
//!
//! # Examples
//!
//! ```no_run
//! use mango::database::{Database, DatabaseConfig};
//! use mango::gateway::{ensure_ledger, MigrationStore};
//!
//! let mut db = Database::open(DatabaseConfig::new("/tmp/app.db")).unwrap();
//! ensure_ledger(&mut db).unwrap();
//!
//! for record in db.list_records().unwrap() {
//!     println!("{} applied={}", record.identity(), record.is_applied());
//! }
//! ```

mod config;
mod connection;
mod operations;
mod schema;

#[cfg(test)]
pub(crate) mod test_util;

pub use config::DatabaseConfig;
pub use connection::Database;
pub use schema::DEFAULT_TABLE;
