//! Up command implementation.
//!
//! Applies the requested migrations. Unless `--no-prerequisites` is given,
//! unapplied dependencies are applied first.

use crate::error::CliError;
use crate::utils::{load_configuration, open_session, print_report, GlobalOptions};
use clap::Args;

/// Apply migrations.
#[derive(Args)]
pub struct UpCommand {
    /// Migrations to apply (file names), or `*`/`all` for every migration
    #[arg(value_name = "MIGRATION", required = true)]
    pub migrations: Vec<String>,

    /// Fail instead of applying unapplied dependencies
    #[arg(long)]
    pub no_prerequisites: bool,

    /// Show what would run without touching the database
    #[arg(long)]
    pub dry_run: bool,
}

impl UpCommand {
    /// Execute the up command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;

        let mut options = config.run_options().with_dry_run(self.dry_run);
        if self.no_prerequisites {
            options = options.with_auto_apply_prerequisites(false);
        }

        let mut session = open_session(global, &config, options)?;
        let report = session.apply(&self.migrations);

        print_report(global, &report, "applied");
        CliError::from_report(&report)
    }
}
