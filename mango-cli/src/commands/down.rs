//! Down command implementation.
//!
//! Reverts the requested migrations. A migration that other applied
//! migrations still require is refused; request the dependents too (or
//! `*`) and they are reverted first.

use crate::error::CliError;
use crate::utils::{load_configuration, open_session, print_report, GlobalOptions};
use clap::Args;

/// Revert migrations.
#[derive(Args)]
pub struct DownCommand {
    /// Migrations to revert (file names), or `*`/`all` for every migration
    #[arg(value_name = "MIGRATION", required = true)]
    pub migrations: Vec<String>,

    /// Show what would run without touching the database
    #[arg(long)]
    pub dry_run: bool,
}

impl DownCommand {
    /// Execute the down command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let options = config.run_options().with_dry_run(self.dry_run);

        let mut session = open_session(global, &config, options)?;
        let report = session.revert(&self.migrations);

        print_report(global, &report, "reverted");
        CliError::from_report(&report)
    }
}
