//! One migration run against a configured database.
//!
//! A session performs the whole startup sequence (load sources, open the
//! database, ensure the ledger, read records, reconcile) and then serves
//! apply and revert requests against the resulting working set.

use std::path::Path;

use crate::config::Config;
use crate::database::{Database, DatabaseConfig};
use crate::error::Result;
use crate::gateway::{ensure_ledger, MigrationStore};
use crate::migration::{MigrationLoader, SourceFailure};
use crate::reconcile::{reconcile, ReconcileOptions, WorkingSet};

use super::executor::{Migrator, RunOptions};
use super::report::RunReport;

/// A reconciled working set bound to its database.
///
/// # Examples
///
/// ```no_run
/// use mango::config::ConfigBuilder;
/// use mango::operations::Session;
///
/// let config = ConfigBuilder::new().build().unwrap();
/// let mut session = Session::open(&config).unwrap();
///
/// let report = session.apply(&["*".to_string()]);
/// for identity in &report.completed {
///     println!("applied {identity}");
/// }
/// ```
#[derive(Debug)]
pub struct Session {
    database: Database,
    working_set: WorkingSet,
    load_failures: Vec<SourceFailure>,
    options: RunOptions,
}

impl Session {
    /// Opens the configured database and reconciles it with the sources.
    ///
    /// # Errors
    ///
    /// Returns an error if no database is configured, the migrations
    /// directory cannot be listed, the database cannot be opened, or
    /// reconciliation fails.
    pub fn open(config: &Config) -> Result<Self> {
        Self::open_with_options(config, config.run_options())
    }

    /// Like [`Session::open`], with explicit run options.
    ///
    /// The options are in effect during startup, so a dry run never
    /// creates the ledger table. A dry run opens an existing database
    /// read-only and a missing one as an empty in-memory database, leaving
    /// the filesystem untouched.
    ///
    /// # Errors
    ///
    /// Same as [`Session::open`].
    pub fn open_with_options(config: &Config, options: RunOptions) -> Result<Self> {
        let loader = MigrationLoader::new(config.file_pattern())?;
        let db_config = DatabaseConfig::new(config.database_path()?)
            .with_table(config.table())
            .with_busy_timeout(config.busy_timeout());
        let database = if !options.dry_run {
            Database::open(db_config)?
        } else if db_config.path.exists() {
            Database::open(db_config.read_only())?
        } else {
            log::info!(
                "database {} does not exist; dry run starts from an empty database",
                db_config.path.display()
            );
            Database::open_in_memory(db_config)?
        };

        Self::prepare(
            database,
            &loader,
            config.migrations_dir(),
            config.reconcile_options(),
            options,
        )
    }

    /// Runs the startup sequence on an already opened database.
    ///
    /// In dry-run mode a missing ledger table is not created; the ledger is
    /// treated as empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be listed, the ledger cannot
    /// be read or created, or reconciliation fails.
    pub fn prepare(
        mut database: Database,
        loader: &MigrationLoader,
        migrations_dir: &Path,
        reconcile_options: ReconcileOptions,
        options: RunOptions,
    ) -> Result<Self> {
        let loaded = loader.load_dir(migrations_dir)?;

        let records = if options.dry_run && !database.table_exists()? {
            log::info!("no ledger table found; dry run treats every migration as unapplied");
            Vec::new()
        } else {
            ensure_ledger(&mut database)?;
            database.list_records()?
        };

        let working_set = reconcile(loaded.migrations, records, &reconcile_options)?;
        log::debug!(
            "working set has {} migrations, {} orphaned records",
            working_set.len(),
            working_set.orphans().len()
        );

        Ok(Self {
            database,
            working_set,
            load_failures: loaded.failures,
            options,
        })
    }

    /// Replaces the run options used by later requests.
    #[must_use]
    pub const fn with_options(mut self, options: RunOptions) -> Self {
        self.options = options;
        self
    }

    /// Applies the requested identities (`*`/`all` for every one).
    pub fn apply(&mut self, requested: &[String]) -> RunReport {
        Migrator::new(&mut self.working_set, &mut self.database)
            .with_options(self.options)
            .apply_all(requested)
    }

    /// Reverts the requested identities (`*`/`all` for every one).
    pub fn revert(&mut self, requested: &[String]) -> RunReport {
        Migrator::new(&mut self.working_set, &mut self.database)
            .with_options(self.options)
            .revert_all(requested)
    }

    /// The reconciled working set, reflecting every change made so far.
    #[must_use]
    pub const fn working_set(&self) -> &WorkingSet {
        &self.working_set
    }

    /// Sources that could not be parsed and were skipped.
    #[must_use]
    pub fn load_failures(&self) -> &[SourceFailure] {
        &self.load_failures
    }

    /// The run options in effect.
    #[must_use]
    pub const fn options(&self) -> RunOptions {
        self.options
    }

    /// The underlying database.
    #[must_use]
    pub const fn database(&self) -> &Database {
        &self.database
    }
}
