//! Command to check configuration and migration sources.
//!
//! Everything a real run would do before executing SQL is performed:
//! configuration is merged and validated, sources are parsed, and the
//! dependency graph is reconciled against the ledger. Nothing is written.

use crate::error::CliError;
use crate::utils::{load_configuration, open_session, GlobalOptions};
use clap::Args;

/// Check configuration and migration files.
#[derive(Args)]
pub struct ValidateCommand {
    /// Treat ledger records without a source file as errors
    #[arg(long)]
    pub strict: bool,
}

impl ValidateCommand {
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let mut config = load_configuration(global)?;
        if self.strict {
            config.strict_orphans = Some(true);
        }

        let options = config.run_options().with_dry_run(true);
        let session = open_session(global, &config, options)?;

        let failures = session.load_failures().len();
        if failures > 0 {
            return Err(CliError::InvalidSources(failures));
        }

        let set = session.working_set();
        let pending = set.iter().filter(|m| !m.is_applied()).count();
        if !global.quiet {
            println!(
                "{} migration(s), {} pending, {} orphaned record(s)",
                set.len(),
                pending,
                set.orphans().len()
            );
            println!("Configuration is valid");
        }
        Ok(())
    }
}
