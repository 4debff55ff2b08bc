//! Error types for the mango library.
//!
//! This module provides the error hierarchy for every stage of a migration
//! run: parsing sources, reconciling them with the ledger, and applying or
//! reverting units. Errors use `thiserror` and always name the offending
//! identity or file.

use std::path::PathBuf;

use thiserror::Error;

use crate::migration::Direction;

/// Result type alias for operations that may fail with a mango error.
///
/// # Examples
///
/// ```
/// use mango::{Error, Result};
///
/// fn example_operation() -> Result<usize> {
///     Ok(3)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the mango library.
#[derive(Debug, Error)]
pub enum Error {
    /// A migration source could not be read.
    #[error("failed to read migration source {}: {source}", path.display())]
    SourceRead {
        /// Path of the unreadable source.
        path: PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// A migration source has no name to derive an identity from.
    #[error("migration source has no identity")]
    EmptyIdentity,

    /// A `--mango` directive used an unknown command.
    #[error("{source_name}:{line}: invalid mango directive '{command}'")]
    InvalidDirective {
        /// Name of the source containing the directive.
        source_name: String,
        /// One-based line number of the directive.
        line: usize,
        /// The unrecognized command token.
        command: String,
    },

    /// A `--mango` directive is missing a required argument.
    #[error("{source_name}:{line}: directive '{directive}' requires at least one argument")]
    MissingArgument {
        /// Name of the source containing the directive.
        source_name: String,
        /// One-based line number of the directive.
        line: usize,
        /// The directive missing its argument.
        directive: String,
    },

    /// A unit requires an identity that is not in the working set.
    #[error("migration {identity} requires {required}, which does not exist")]
    MissingDependency {
        /// The unit declaring the requirement.
        identity: String,
        /// The identity that could not be resolved.
        required: String,
    },

    /// The requirement relation contains a cycle.
    #[error("dependency cycle detected: {cycle}")]
    DependencyCycle {
        /// The cycle rendered as `a -> b -> a`.
        cycle: String,
    },

    /// The ledger records a migration that has no source file.
    #[error("migration {identity} is recorded in the ledger but has no source file")]
    OrphanedRecord {
        /// The orphaned identity.
        identity: String,
    },

    /// A requested identity is not in the working set.
    #[error("unknown migration requested: {identity}")]
    UnknownRequestedIdentity {
        /// The requested identity.
        identity: String,
    },

    /// A dependency is unapplied and prerequisites are not applied automatically.
    #[error("migration {identity} requires {dependency}, which has not been applied")]
    UnappliedDependency {
        /// The unit being applied.
        identity: String,
        /// The unapplied dependency.
        dependency: String,
    },

    /// A migration body failed against the database.
    #[error("migration {identity} failed to run {direction}: {source}")]
    ExecutionFailed {
        /// The failing unit.
        identity: String,
        /// The direction being run.
        direction: Direction,
        /// The underlying execution error.
        #[source]
        source: Box<Error>,
    },

    /// A migration body ran but its ledger record could not be written.
    ///
    /// Reported only by the run in which it happens. The ledger keeps the
    /// old state, so a later run cannot tell that the body already ran.
    #[error(
        "migration {identity} ran {direction} but the ledger was not updated; \
         database and ledger are out of sync: {source}"
    )]
    PersistedStateDesync {
        /// The unit whose ledger write failed.
        identity: String,
        /// The direction that was run.
        direction: Direction,
        /// The underlying persistence error.
        #[source]
        source: Box<Error>,
    },

    /// A revert was requested for a unit other applied units still require.
    #[error("cannot revert {identity}: still required by {}", dependents.join(", "))]
    DependentsStillApplied {
        /// The unit requested for revert.
        identity: String,
        /// Applied units that require it.
        dependents: Vec<String>,
    },

    /// A required configuration value was not supplied.
    #[error("missing configuration: {field}")]
    MissingConfiguration {
        /// The missing field.
        field: String,
    },

    /// An invalid filesystem path was provided.
    #[error("invalid path {}: {reason}", path.display())]
    InvalidPath {
        /// The invalid path.
        path: PathBuf,
        /// The reason the path is invalid.
        reason: String,
    },

    /// A database error occurred.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A configuration file could not be parsed.
    #[error("invalid configuration file {}: {source}", path.display())]
    Configuration {
        /// The configuration file.
        path: PathBuf,
        /// The YAML error.
        #[source]
        source: serde_yaml::Error,
    },

    /// A ledger column could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A validation error occurred.
    #[error("validation error for '{field}': {message}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// A description of the validation failure.
        message: String,
    },
}

/// How far the effect of an error reaches within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Affects a single source file, which is skipped.
    Source,
    /// Affects a single requested identity; siblings may still run.
    Request,
    /// Aborts the whole batch before any migration runs.
    Batch,
    /// The database and the ledger disagree.
    Desync,
    /// Environment or setup failure outside the migration graph.
    Setup,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Source => write!(f, "source"),
            Self::Request => write!(f, "request"),
            Self::Batch => write!(f, "batch"),
            Self::Desync => write!(f, "desync"),
            Self::Setup => write!(f, "setup"),
        }
    }
}

impl Error {
    /// Classifies this error by the scope it affects.
    ///
    /// # Examples
    ///
    /// ```
    /// use mango::{Error, Severity};
    ///
    /// let err = Error::MissingDependency {
    ///     identity: "002_add.sql".into(),
    ///     required: "001_init.sql".into(),
    /// };
    /// assert_eq!(err.severity(), Severity::Batch);
    /// ```
    #[must_use]
    pub fn severity(&self) -> Severity {
        match self {
            Self::SourceRead { .. }
            | Self::EmptyIdentity
            | Self::InvalidDirective { .. }
            | Self::MissingArgument { .. } => Severity::Source,
            Self::MissingDependency { .. }
            | Self::DependencyCycle { .. }
            | Self::OrphanedRecord { .. } => Severity::Batch,
            Self::UnknownRequestedIdentity { .. }
            | Self::UnappliedDependency { .. }
            | Self::ExecutionFailed { .. }
            | Self::DependentsStillApplied { .. } => Severity::Request,
            Self::PersistedStateDesync { .. } => Severity::Desync,
            Self::MissingConfiguration { .. }
            | Self::InvalidPath { .. }
            | Self::Database(_)
            | Self::Configuration { .. }
            | Self::Serialization(_)
            | Self::Io(_)
            | Self::Validation { .. } => Severity::Setup,
        }
    }

    /// Returns true if the database and the ledger may have diverged.
    #[must_use]
    pub fn is_desync(&self) -> bool {
        matches!(self, Self::PersistedStateDesync { .. })
    }

    /// Returns the migration identity this error concerns, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use mango::Error;
    ///
    /// let err = Error::UnknownRequestedIdentity { identity: "003_x.sql".into() };
    /// assert_eq!(err.identity(), Some("003_x.sql"));
    /// ```
    #[must_use]
    pub fn identity(&self) -> Option<&str> {
        match self {
            Self::InvalidDirective { source_name, .. } | Self::MissingArgument { source_name, .. } => {
                Some(source_name.as_str())
            }
            Self::MissingDependency { identity, .. }
            | Self::OrphanedRecord { identity }
            | Self::UnknownRequestedIdentity { identity }
            | Self::UnappliedDependency { identity, .. }
            | Self::ExecutionFailed { identity, .. }
            | Self::PersistedStateDesync { identity, .. }
            | Self::DependentsStillApplied { identity, .. } => Some(identity.as_str()),
            _ => None,
        }
    }
}
