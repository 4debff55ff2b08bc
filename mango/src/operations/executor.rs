//! Dependency-ordered execution of migration units.
//!
//! Applying a unit first applies every unit it depends on, depth first and
//! in declaration order, then runs its own up body and records it. Units
//! that are already applied are skipped, so every unit runs at most once no
//! matter how many requested units share it.
//!
//! Traversal uses an explicit stack rather than recursion; a unit met again
//! while it is still on the stack is reported as a cycle.

use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};

use chrono::Utc;

use crate::error::{Error, Result};
use crate::gateway::{MigrationStore, StatementExecutor};
use crate::migration::{Direction, Migration};
use crate::reconcile::WorkingSet;

use super::report::RunReport;

/// Request tokens that stand for every unit in the working set.
pub const ALL_SENTINELS: [&str; 2] = ["*", "all"];

/// Options for a migration run.
///
/// # Examples
///
/// ```
/// use mango::operations::RunOptions;
///
/// let options = RunOptions::default().with_dry_run(true);
/// assert!(options.auto_apply_prerequisites);
/// assert!(options.dry_run);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    /// Apply unapplied dependencies of a requested unit first.
    ///
    /// When false, a requested unit with an unapplied dependency fails.
    pub auto_apply_prerequisites: bool,

    /// Plan only; nothing is executed or recorded.
    pub dry_run: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            auto_apply_prerequisites: true,
            dry_run: false,
        }
    }
}

impl RunOptions {
    /// Sets whether prerequisites are applied automatically.
    #[must_use]
    pub const fn with_auto_apply_prerequisites(mut self, enabled: bool) -> Self {
        self.auto_apply_prerequisites = enabled;
        self
    }

    /// Sets dry-run mode.
    #[must_use]
    pub const fn with_dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }
}

/// Expands the request list into concrete identities.
///
/// Any sentinel (`*` or `all`) expands to every identity in the working
/// set; other tokens naming unknown identities are kept after the expansion
/// so they still fail. Duplicates are dropped; first occurrence wins.
///
/// # Examples
///
/// ```
/// use mango::migration::parse;
/// use mango::operations::expand_requested;
/// use mango::reconcile::{reconcile, ReconcileOptions};
///
/// let units = vec![parse("A;", "a.sql").unwrap(), parse("B;", "b.sql").unwrap()];
/// let set = reconcile(units, Vec::new(), &ReconcileOptions::default()).unwrap();
///
/// assert_eq!(expand_requested(&set, &["*".to_string()]), ["a.sql", "b.sql"]);
/// assert_eq!(expand_requested(&set, &["b.sql".to_string(), "b.sql".to_string()]), ["b.sql"]);
/// ```
#[must_use]
pub fn expand_requested(working_set: &WorkingSet, requested: &[String]) -> Vec<String> {
    let is_sentinel = |r: &String| ALL_SENTINELS.contains(&r.as_str());

    let mut seen = HashSet::new();
    if requested.iter().any(is_sentinel) {
        return working_set
            .identities()
            .map(str::to_string)
            .chain(
                requested
                    .iter()
                    .filter(|r| !is_sentinel(*r) && !working_set.contains(r))
                    .cloned(),
            )
            .filter(|r| seen.insert(r.clone()))
            .collect();
    }

    requested
        .iter()
        .filter(|r| seen.insert(r.to_string()))
        .cloned()
        .collect()
}

/// Applies and reverts units of a working set against a target database.
///
/// # Examples
///
/// ```no_run
/// use mango::operations::{Migrator, RunOptions};
/// use mango::{Database, DatabaseConfig, MigrationLoader};
/// use mango::reconcile::{reconcile, ReconcileOptions};
/// use mango::gateway::{ensure_ledger, MigrationStore};
/// use std::path::Path;
///
/// let mut db = Database::open(DatabaseConfig::new("/tmp/app.db")).unwrap();
/// ensure_ledger(&mut db).unwrap();
/// let loaded = MigrationLoader::default().load_dir(Path::new("migrations")).unwrap();
/// let records = db.list_records().unwrap();
/// let mut set = reconcile(loaded.migrations, records, &ReconcileOptions::default()).unwrap();
///
/// let mut migrator = Migrator::new(&mut set, &mut db).with_options(RunOptions::default());
/// let report = migrator.apply_all(&["*".to_string()]);
/// assert!(report.is_success());
/// ```
pub struct Migrator<'a, T> {
    working_set: &'a mut WorkingSet,
    target: &'a mut T,
    options: RunOptions,
}

impl<'a, T> Migrator<'a, T>
where
    T: StatementExecutor + MigrationStore,
{
    /// Creates a migrator with default options.
    #[must_use]
    pub fn new(working_set: &'a mut WorkingSet, target: &'a mut T) -> Self {
        Self {
            working_set,
            target,
            options: RunOptions::default(),
        }
    }

    /// Replaces the run options.
    #[must_use]
    pub const fn with_options(mut self, options: RunOptions) -> Self {
        self.options = options;
        self
    }

    /// The working set, reflecting every state change made so far.
    #[must_use]
    pub fn working_set(&self) -> &WorkingSet {
        &*self.working_set
    }

    /// Lists the units that applying `identity` would run, in order.
    ///
    /// Returns an empty plan when `identity` is already applied.
    ///
    /// # Errors
    ///
    /// Returns an error if `identity` is unknown, a dependency is unapplied
    /// while prerequisites are not applied automatically, or a cycle is met.
    pub fn plan_apply(&self, identity: &str) -> Result<Vec<String>> {
        self.plan_apply_assuming(identity, &HashSet::new())
    }

    /// Plans as if every identity in `assumed` were already applied.
    fn plan_apply_assuming(&self, identity: &str, assumed: &HashSet<String>) -> Result<Vec<String>> {
        let working_set = &*self.working_set;
        let root = working_set
            .get(identity)
            .ok_or_else(|| Error::UnknownRequestedIdentity {
                identity: identity.to_string(),
            })?;
        let done = |unit: &Migration| unit.is_applied() || assumed.contains(unit.identity());

        let mut plan = Vec::new();
        if done(root) {
            return Ok(plan);
        }

        let mut planned: HashSet<&str> = HashSet::new();
        let mut in_progress: HashSet<&str> = HashSet::from([root.identity()]);
        let mut stack: Vec<(&Migration, usize)> = vec![(root, 0)];

        while let Some(&(unit, next)) = stack.last() {
            let Some(required) = unit.dependencies().get(next) else {
                stack.pop();
                in_progress.remove(unit.identity());
                planned.insert(unit.identity());
                plan.push(unit.identity().to_string());
                continue;
            };
            if let Some(top) = stack.last_mut() {
                top.1 += 1;
            }

            let dependency = working_set
                .get(required)
                .ok_or_else(|| Error::MissingDependency {
                    identity: unit.identity().to_string(),
                    required: required.clone(),
                })?;
            if done(dependency) || planned.contains(dependency.identity()) {
                continue;
            }
            if in_progress.contains(dependency.identity()) {
                return Err(Error::DependencyCycle {
                    cycle: cycle_through(&stack, dependency.identity()),
                });
            }
            if !self.options.auto_apply_prerequisites {
                return Err(Error::UnappliedDependency {
                    identity: unit.identity().to_string(),
                    dependency: dependency.identity().to_string(),
                });
            }

            in_progress.insert(dependency.identity());
            stack.push((dependency, 0));
        }

        Ok(plan)
    }

    /// Applies `identity` and any unapplied dependencies.
    ///
    /// Returns the identities applied, in order; empty if it was already
    /// applied. In dry-run mode returns the plan without running it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ExecutionFailed`] if a body fails (that unit stays
    /// unapplied and nothing after it runs) or
    /// [`Error::PersistedStateDesync`] if a body ran but its record could
    /// not be written, plus any planning error.
    pub fn apply(&mut self, identity: &str) -> Result<Vec<String>> {
        let mut applied = Vec::new();
        self.apply_into(identity, &mut applied)?;
        Ok(applied)
    }

    fn apply_into(&mut self, identity: &str, applied: &mut Vec<String>) -> Result<()> {
        let plan = self.plan_apply(identity)?;
        if self.options.dry_run {
            applied.extend(plan);
            return Ok(());
        }

        for unit in plan {
            self.run_unit(&unit, Direction::Up)?;
            applied.push(unit);
        }
        Ok(())
    }

    /// Applies every requested identity, expanding `*`/`all`.
    ///
    /// A failed identity is recorded and the batch moves on to the next
    /// one. A desync stops the batch, since the ledger can no longer be
    /// trusted.
    pub fn apply_all(&mut self, requested: &[String]) -> RunReport {
        let mut report = RunReport::new(Direction::Up, self.options.dry_run);
        let mut assumed = HashSet::new();

        for identity in expand_requested(&*self.working_set, requested) {
            let mut applied = Vec::new();
            let result = if self.options.dry_run {
                self.plan_apply_assuming(&identity, &assumed)
                    .map(|plan| applied.extend(plan))
            } else {
                self.apply_into(&identity, &mut applied)
            };

            let nothing_to_do = applied.is_empty();
            if self.options.dry_run {
                assumed.extend(applied.iter().cloned());
            }
            report.completed.extend(applied);

            match result {
                Ok(()) if nothing_to_do => report.skipped.push(identity),
                Ok(()) => {}
                Err(error) => {
                    let halt = error.is_desync();
                    report.record_failure(&identity, error);
                    if halt {
                        log::error!("halting run: database and ledger are out of sync");
                        report.halted = true;
                        break;
                    }
                }
            }
        }

        report
    }

    /// Reverts `identity` by running its down body.
    ///
    /// Returns false if it was not applied.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DependentsStillApplied`] if another applied unit
    /// requires it (its down body is not run), otherwise the same errors as
    /// [`Migrator::apply`].
    pub fn revert(&mut self, identity: &str) -> Result<bool> {
        self.revert_assuming(identity, &HashSet::new())
    }

    /// Reverts as if every identity in `reverted` were already reverted.
    fn revert_assuming(&mut self, identity: &str, reverted: &HashSet<String>) -> Result<bool> {
        let unit = self
            .working_set
            .get(identity)
            .ok_or_else(|| Error::UnknownRequestedIdentity {
                identity: identity.to_string(),
            })?;
        if !unit.is_applied() || reverted.contains(identity) {
            return Ok(false);
        }

        let dependents: Vec<String> = self
            .working_set
            .applied_dependents(identity)
            .into_iter()
            .filter(|d| !reverted.contains(d))
            .collect();
        if !dependents.is_empty() {
            return Err(Error::DependentsStillApplied {
                identity: identity.to_string(),
                dependents,
            });
        }

        if !self.options.dry_run {
            self.run_unit(identity, Direction::Down)?;
        }
        Ok(true)
    }

    /// Reverts every requested identity, expanding `*`/`all`.
    ///
    /// Requested identities are processed dependents first, so a chain can
    /// be reverted in one batch. Failure handling matches
    /// [`Migrator::apply_all`].
    pub fn revert_all(&mut self, requested: &[String]) -> RunReport {
        let mut report = RunReport::new(Direction::Down, self.options.dry_run);
        let mut reverted = HashSet::new();

        let position: HashMap<&str, usize> = self
            .working_set
            .topological_order()
            .iter()
            .enumerate()
            .map(|(i, id)| (id.as_str(), i))
            .collect();
        let mut ordered = expand_requested(&*self.working_set, requested);
        ordered.sort_by_key(|id| Reverse(position.get(id.as_str()).copied()));
        drop(position);

        for identity in ordered {
            match self.revert_assuming(&identity, &reverted) {
                Ok(true) => {
                    reverted.insert(identity.clone());
                    report.completed.push(identity);
                }
                Ok(false) => report.skipped.push(identity),
                Err(error) => {
                    let halt = error.is_desync();
                    report.record_failure(&identity, error);
                    if halt {
                        log::error!("halting run: database and ledger are out of sync");
                        report.halted = true;
                        break;
                    }
                }
            }
        }

        report
    }

    /// Runs one unit's body in `direction` and records the new state.
    fn run_unit(&mut self, identity: &str, direction: Direction) -> Result<()> {
        let body = self
            .working_set
            .get(identity)
            .map(|unit| unit.body(direction).to_string())
            .ok_or_else(|| Error::UnknownRequestedIdentity {
                identity: identity.to_string(),
            })?;

        log::info!("running {direction} for {identity}");
        self.target
            .execute(&body)
            .map_err(|source| Error::ExecutionFailed {
                identity: identity.to_string(),
                direction,
                source: Box::new(source),
            })?;

        let order = self.working_set.next_order();
        let Some(unit) = self.working_set.get_mut(identity) else {
            return Err(Error::UnknownRequestedIdentity {
                identity: identity.to_string(),
            });
        };
        match direction {
            Direction::Up => unit.mark_applied(Utc::now(), order),
            Direction::Down => unit.mark_reverted(),
        }

        self.target
            .upsert_record(unit)
            .map_err(|source| Error::PersistedStateDesync {
                identity: identity.to_string(),
                direction,
                source: Box::new(source),
            })
    }
}

/// Renders the stack segment from `identity` to the top as a cycle path.
fn cycle_through(stack: &[(&Migration, usize)], identity: &str) -> String {
    let start = stack
        .iter()
        .position(|(unit, _)| unit.identity() == identity)
        .unwrap_or(0);
    let mut path: Vec<&str> = stack[start..].iter().map(|(unit, _)| unit.identity()).collect();
    path.push(identity);
    path.join(" -> ")
}
