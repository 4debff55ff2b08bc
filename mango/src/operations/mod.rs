//! Applying and reverting migrations.
//!
//! [`Migrator`] drives a reconciled [`crate::reconcile::WorkingSet`] against
//! any target implementing the gateway traits. Planning is separate from
//! execution, so a dry run reports exactly what a real run would do.
//! [`Session`] wires the whole pipeline to a configured `SQLite` database.
//!
//! # Examples
//!
//! ```no_run
//! use mango::operations::{RunOptions, Session};
//! use mango::config::ConfigBuilder;
//!
//! let config = ConfigBuilder::new().build().unwrap();
//! let mut session = Session::open(&config)
//!     .unwrap()
//!     .with_options(RunOptions::default().with_dry_run(true));
//!
//! let report = session.apply(&["002_add.sql".to_string()]);
//! println!("would apply: {:?}", report.completed);
//! ```

pub mod executor;
pub mod report;
pub mod session;

#[cfg(test)]
mod proptests;

pub use executor::{expand_requested, Migrator, RunOptions, ALL_SENTINELS};
pub use report::{RunFailure, RunReport};
pub use session::Session;
