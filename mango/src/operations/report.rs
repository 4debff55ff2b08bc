//! Outcome of a batch run.

use crate::error::Error;
use crate::migration::Direction;

/// A requested identity that could not be brought to the target state.
#[derive(Debug)]
pub struct RunFailure {
    /// The identity as it was requested.
    pub identity: String,
    /// Why it failed.
    pub error: Error,
}

/// What a batch apply or revert did.
///
/// # Examples
///
/// ```
/// use mango::operations::RunReport;
/// use mango::migration::Direction;
///
/// let report = RunReport::new(Direction::Up, false);
/// assert!(report.is_success());
/// assert!(report.completed.is_empty());
/// ```
#[derive(Debug)]
pub struct RunReport {
    /// Direction of the run.
    pub direction: Direction,

    /// Whether this was a dry run (nothing executed or recorded).
    pub dry_run: bool,

    /// Identities applied or reverted, in execution order.
    pub completed: Vec<String>,

    /// Requested identities that were already in the target state.
    pub skipped: Vec<String>,

    /// Requested identities that failed.
    pub failures: Vec<RunFailure>,

    /// Whether the batch stopped early because of a ledger desync.
    pub halted: bool,
}

impl RunReport {
    /// Creates an empty report.
    #[must_use]
    pub const fn new(direction: Direction, dry_run: bool) -> Self {
        Self {
            direction,
            dry_run,
            completed: Vec::new(),
            skipped: Vec::new(),
            failures: Vec::new(),
            halted: false,
        }
    }

    /// Returns true if no requested identity failed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Returns true if any failure left the database and ledger out of sync.
    #[must_use]
    pub fn has_desync(&self) -> bool {
        self.failures.iter().any(|f| f.error.is_desync())
    }

    pub(crate) fn record_failure(&mut self, identity: &str, error: Error) {
        log::error!("{error}");
        self.failures.push(RunFailure {
            identity: identity.to_string(),
            error,
        });
    }
}
