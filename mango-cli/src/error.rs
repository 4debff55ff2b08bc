//! CLI-specific error types with exit codes.
//!
//! This module defines error types specific to the CLI layer,
//! wrapping library errors and providing appropriate exit codes.

use mango::{Error as LibError, RunReport, Severity};
use std::fmt;

/// CLI-specific error type with exit code mapping.
#[derive(Debug)]
pub enum CliError {
    /// Library error (wrapped).
    Library(LibError),

    /// One or more requested migrations failed.
    MigrationsFailed {
        /// Number of failed requests.
        failed: usize,
        /// Number of requests that completed.
        completed: usize,
    },

    /// Migration sources could not be parsed.
    InvalidSources(usize),

    /// The database changed but the ledger could not be updated.
    Desync(String),

    /// A required setting (such as the database) was not given.
    MissingConfiguration(String),

    /// Invalid command-line arguments.
    InvalidArguments(String),

    /// I/O error.
    Io(std::io::Error),

    /// Configuration error.
    Config(String),
}

impl CliError {
    /// Get the appropriate exit code for this error.
    ///
    /// Exit codes:
    /// - 0: Success (not an error)
    /// - 1: Migrations failed (bad graph, bad source, failed SQL, refused revert)
    /// - 2: Database and ledger out of sync
    /// - 3: Missing configuration
    /// - 4: Invalid arguments
    /// - 5: I/O error
    /// - 6: Other library error
    /// - 7: Configuration error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::MigrationsFailed { .. } | CliError::InvalidSources(_) => 1,
            CliError::Library(lib_err) => match lib_err.severity() {
                Severity::Request | Severity::Batch | Severity::Source => 1,
                Severity::Desync => 2,
                Severity::Setup => 6,
            },
            CliError::Desync(_) => 2,
            CliError::MissingConfiguration(_) => 3,
            CliError::InvalidArguments(_) => 4,
            CliError::Io(_) => 5,
            CliError::Config(_) => 7,
        }
    }

    /// Turns an unsuccessful run report into an error.
    pub fn from_report(report: &RunReport) -> Result<(), CliError> {
        if let Some(desync) = report.failures.iter().find(|f| f.error.is_desync()) {
            return Err(CliError::Desync(desync.error.to_string()));
        }
        if report.is_success() {
            Ok(())
        } else {
            Err(CliError::MigrationsFailed {
                failed: report.failures.len(),
                completed: report.completed.len(),
            })
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Library(e) => write!(f, "{e}"),
            CliError::MigrationsFailed { failed, completed } => write!(
                f,
                "{failed} migration request(s) failed ({completed} migration(s) completed)"
            ),
            CliError::InvalidSources(count) => {
                write!(f, "{count} migration file(s) could not be parsed")
            }
            CliError::Desync(msg) => {
                write!(f, "{msg}; fix the ledger by hand before running again")
            }
            CliError::MissingConfiguration(field) => write!(
                f,
                "Missing configuration: {field} (use --db, MANGO_DATABASE or mango.yaml)"
            ),
            CliError::InvalidArguments(msg) => write!(f, "Invalid arguments: {msg}"),
            CliError::Io(e) => write!(f, "I/O error: {e}"),
            CliError::Config(msg) => write!(f, "Configuration error: {msg}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Library(e) => Some(e),
            CliError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LibError> for CliError {
    fn from(e: LibError) -> Self {
        match e {
            LibError::MissingConfiguration { field } => CliError::MissingConfiguration(field),
            LibError::Configuration { .. } | LibError::Validation { .. } => {
                CliError::Config(e.to_string())
            }
            LibError::Io(io) => CliError::Io(io),
            other => CliError::Library(other),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e)
    }
}
