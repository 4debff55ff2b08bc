#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # mango
//!
//! A library for dependency-aware SQL schema migrations.
//!
//! Each migration is a SQL file with an up body, a down body, and `requires`
//! directives naming the migrations it depends on. Applying a migration
//! applies its dependencies first; reverting one is refused while another
//! applied migration still requires it. Applied state is kept in a ledger
//! table inside the migrated database.
//!
//! ## Core Types
//!
//! - [`Migration`] and [`migration::parse`]: migration units and the directive parser
//! - [`WorkingSet`] and [`reconcile()`]: sources merged with the ledger
//! - [`Migrator`] and [`Session`]: applying and reverting
//! - [`Database`]: the `SQLite` target and ledger
//! - [`Error`] and [`Result`]: Error handling types
//! - [`Logger`] and [`LogLevel`]: Logging infrastructure
//!
//! ## Examples
//!
//! ```
//! use mango::{reconcile, Database, DatabaseConfig, Migrator, ReconcileOptions};
//! use mango::migration::parse;
//!
//! let init = parse("--mango up\nCREATE TABLE t (id INTEGER);\n--mango down\nDROP TABLE t;\n", "001_init.sql").unwrap();
//! let add = parse("--mango requires 001_init.sql\nALTER TABLE t ADD COLUMN x INTEGER;\n", "002_add.sql").unwrap();
//!
//! let mut db = Database::open_in_memory(DatabaseConfig::new(":memory:")).unwrap();
//! mango::gateway::ensure_ledger(&mut db).unwrap();
//! let mut set = reconcile(vec![init, add], Vec::new(), &ReconcileOptions::default()).unwrap();
//!
//! let applied = Migrator::new(&mut set, &mut db).apply("002_add.sql").unwrap();
//! assert_eq!(applied, ["001_init.sql", "002_add.sql"]);
//! ```

pub mod config;
pub mod database;
pub mod error;
pub mod gateway;
pub mod logging;
pub mod migration;
pub mod operations;
pub mod reconcile;

// Re-export key types at crate root for convenience
pub use config::{Config, ConfigBuilder};
pub use database::{Database, DatabaseConfig};
pub use error::{Error, Result, Severity};
pub use gateway::{MigrationStore, StatementExecutor};
pub use logging::{init_logger, LogLevel, Logger};
pub use migration::{Direction, Migration, MigrationLoader};
pub use operations::{Migrator, RunOptions, RunReport, Session};
pub use reconcile::{reconcile, ReconcileOptions, WorkingSet};
