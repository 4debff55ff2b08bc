//! The migration unit type and its builder.

use chrono::{DateTime, Utc};

use crate::error::{Error, Result};

/// One migration unit: an identity, its requirements, and two bodies.
///
/// Units are created by the parser with `applied == false`. The reconciler
/// merges the ledger's applied state into them and resolves their
/// dependencies; the executor flips the applied state as it runs.
///
/// # Examples
///
/// ```
/// use mango::Migration;
///
/// let unit = Migration::builder("001_init.sql")
///     .up_body("CREATE TABLE t(id int);\n")
///     .down_body("DROP TABLE t;\n")
///     .build()
///     .unwrap();
///
/// assert_eq!(unit.identity(), "001_init.sql");
/// assert!(!unit.is_applied());
/// assert!(unit.applied_at().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Migration {
    identity: String,
    required_identities: Vec<String>,
    up_body: String,
    down_body: String,
    applied: bool,
    applied_at: Option<DateTime<Utc>>,
    order_applied: Option<i64>,
    dependencies: Vec<String>,
}

impl Migration {
    /// Creates a new unapplied unit with empty bodies.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyIdentity`] if `identity` is empty.
    pub fn new(identity: impl Into<String>) -> Result<Self> {
        Self::builder(identity).build()
    }

    /// Starts building a unit with the given identity.
    #[must_use]
    pub fn builder(identity: impl Into<String>) -> MigrationBuilder {
        MigrationBuilder::new(identity)
    }

    /// The unit's identity, its source filename.
    #[must_use]
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Identities declared by `requires` directives, in source order.
    #[must_use]
    pub fn required_identities(&self) -> &[String] {
        &self.required_identities
    }

    /// Statement text run when applying.
    #[must_use]
    pub fn up_body(&self) -> &str {
        &self.up_body
    }

    /// Statement text run when reverting.
    #[must_use]
    pub fn down_body(&self) -> &str {
        &self.down_body
    }

    /// The body for the given direction.
    #[must_use]
    pub fn body(&self, direction: super::Direction) -> &str {
        match direction {
            super::Direction::Up => &self.up_body,
            super::Direction::Down => &self.down_body,
        }
    }

    /// Whether the up body has run and been recorded.
    #[must_use]
    pub const fn is_applied(&self) -> bool {
        self.applied
    }

    /// When the unit was applied; present exactly when it is applied.
    #[must_use]
    pub const fn applied_at(&self) -> Option<DateTime<Utc>> {
        self.applied_at
    }

    /// Position of this unit in the ledger's apply sequence.
    #[must_use]
    pub const fn order_applied(&self) -> Option<i64> {
        self.order_applied
    }

    /// Resolved dependencies: deduplicated requirements in declaration order.
    ///
    /// Empty until the reconciler has resolved the working set.
    #[must_use]
    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    pub(crate) fn push_up_line(&mut self, line: &str) {
        self.up_body.push_str(line);
        self.up_body.push('\n');
    }

    pub(crate) fn push_down_line(&mut self, line: &str) {
        self.down_body.push_str(line);
        self.down_body.push('\n');
    }

    pub(crate) fn push_requirement(&mut self, identity: &str) {
        self.required_identities.push(identity.to_string());
    }

    pub(crate) fn set_dependencies(&mut self, dependencies: Vec<String>) {
        self.dependencies = dependencies;
    }

    /// Copies applied state from the ledger's record of the same unit.
    pub(crate) fn merge_recorded_state(&mut self, recorded: &Self) {
        self.applied = recorded.applied;
        self.applied_at = recorded.applied_at;
        self.order_applied = recorded.order_applied;
    }

    pub(crate) fn mark_applied(&mut self, at: DateTime<Utc>, order: i64) {
        self.applied = true;
        self.applied_at = Some(at);
        self.order_applied = Some(order);
    }

    pub(crate) fn mark_reverted(&mut self) {
        self.applied = false;
        self.applied_at = None;
        self.order_applied = None;
    }
}

/// Builder for [`Migration`], used by the ledger when loading records.
#[derive(Debug, Clone)]
pub struct MigrationBuilder {
    identity: String,
    required_identities: Vec<String>,
    up_body: String,
    down_body: String,
    applied_at: Option<DateTime<Utc>>,
    order_applied: Option<i64>,
}

impl MigrationBuilder {
    fn new(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            required_identities: Vec::new(),
            up_body: String::new(),
            down_body: String::new(),
            applied_at: None,
            order_applied: None,
        }
    }

    /// Sets the required identities.
    #[must_use]
    pub fn required_identities(mut self, required: Vec<String>) -> Self {
        self.required_identities = required;
        self
    }

    /// Sets the up body.
    #[must_use]
    pub fn up_body(mut self, body: impl Into<String>) -> Self {
        self.up_body = body.into();
        self
    }

    /// Sets the down body.
    #[must_use]
    pub fn down_body(mut self, body: impl Into<String>) -> Self {
        self.down_body = body.into();
        self
    }

    /// Marks the unit applied at the given time.
    ///
    /// `None` leaves the unit unapplied.
    #[must_use]
    pub fn applied_at(mut self, at: Option<DateTime<Utc>>) -> Self {
        self.applied_at = at;
        self
    }

    /// Sets the apply sequence number.
    #[must_use]
    pub fn order_applied(mut self, order: Option<i64>) -> Self {
        self.order_applied = order;
        self
    }

    /// Builds the unit.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyIdentity`] if the identity is empty or blank.
    pub fn build(self) -> Result<Migration> {
        if self.identity.trim().is_empty() {
            return Err(Error::EmptyIdentity);
        }

        let applied = self.applied_at.is_some();
        Ok(Migration {
            identity: self.identity,
            required_identities: self.required_identities,
            up_body: self.up_body,
            down_body: self.down_body,
            applied,
            applied_at: self.applied_at,
            order_applied: if applied { self.order_applied } else { None },
            dependencies: Vec::new(),
        })
    }
}
