//! Utility functions for CLI operations.
//!
//! This module provides common utility functions used across CLI commands,
//! including configuration loading, session setup, and output formatting.

use crate::error::CliError;
use chrono::{DateTime, Utc};
use mango::{Config, ConfigBuilder, RunOptions, RunReport, Session};
use std::path::PathBuf;

/// Global CLI options shared across all commands.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Enable verbose output.
    pub verbose: bool,

    /// Suppress non-essential output.
    pub quiet: bool,

    /// Explicit configuration file.
    pub config: Option<PathBuf>,

    /// Target database.
    pub database: Option<PathBuf>,

    /// Migration directory.
    pub migrations_dir: Option<PathBuf>,

    /// Ledger table name.
    pub table: Option<String>,

    /// Override the default busy timeout (in seconds).
    pub busy_timeout: Option<u64>,
}

impl GlobalOptions {
    /// The configuration layer formed by command-line flags.
    pub fn overrides(&self) -> Config {
        Config {
            database: self.database.clone(),
            migrations_dir: self.migrations_dir.clone(),
            table: self.table.clone(),
            busy_timeout_seconds: self.busy_timeout,
            ..Config::default()
        }
    }
}

/// Load hierarchical configuration.
///
/// Configuration is merged from multiple sources with precedence:
/// 1. Global options (highest priority)
/// 2. Environment variables
/// 3. Configuration files
/// 4. Built-in defaults (lowest priority)
pub fn load_configuration(global: &GlobalOptions) -> Result<Config, CliError> {
    let mut builder = ConfigBuilder::new();
    if let Some(ref path) = global.config {
        if !path.is_file() {
            return Err(CliError::InvalidArguments(format!(
                "configuration file not found: {}",
                path.display()
            )));
        }
        builder = builder.with_config_file(path);
    }

    builder
        .with_config(global.overrides())
        .build()
        .map_err(CliError::from)
}

/// Opens a session for the configured database and migrations.
///
/// Sources that fail to parse are reported on stderr and skipped.
pub fn open_session(
    global: &GlobalOptions,
    config: &Config,
    options: RunOptions,
) -> Result<Session, CliError> {
    let session = Session::open_with_options(config, options)?;

    if !global.quiet {
        for failure in session.load_failures() {
            eprintln!("Skipped {}: {}", failure.path.display(), failure.error);
        }
    }

    Ok(session)
}

/// Prints the outcome of an apply or revert run to stderr.
pub fn print_report(global: &GlobalOptions, report: &RunReport, verb: &str) {
    if global.quiet {
        return;
    }

    let prefix = if report.dry_run { "Would have " } else { "" };
    for identity in &report.completed {
        eprintln!("{prefix}{verb} {identity}");
    }
    if global.verbose {
        for identity in &report.skipped {
            eprintln!("Skipped {identity} (already {verb})");
        }
    }
    for failure in &report.failures {
        eprintln!("Failed {}: {}", failure.identity, failure.error);
    }
    if report.completed.is_empty() && report.failures.is_empty() {
        eprintln!("Nothing to do");
    }
}

/// Format a timestamp for display.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}
