//! Main entry point for the mango CLI.
//!
//! Commands:
//! - `up`: Apply migrations, pulling in their prerequisites
//! - `down`: Revert migrations, dependents first
//! - `status`: Show the applied state of every migration
//! - `validate`: Check configuration and migration sources
//! - `completions`: Generate shell completion scripts

mod cli;
mod commands;
mod error;
mod utils;

use clap::Parser;
use cli::Cli;
use utils::GlobalOptions;

fn main() {
    let cli = Cli::parse();

    let _level = mango::init_logger(cli.verbose, cli.quiet);

    let global = GlobalOptions {
        verbose: cli.verbose,
        quiet: cli.quiet,
        config: cli.config,
        database: cli.database,
        migrations_dir: cli.migrations_dir,
        table: cli.table,
        busy_timeout: cli.busy_timeout,
    };

    let result = match cli.command {
        cli::Command::Up(cmd) => cmd.execute(&global),
        cli::Command::Down(cmd) => cmd.execute(&global),
        cli::Command::Status(cmd) => cmd.execute(&global),
        cli::Command::Validate(cmd) => cmd.execute(&global),
        cli::Command::Completions(cmd) => cmd.execute(&global),
    };

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
