//! Reconciliation of on-disk units with the ledger.
//!
//! The reconciler builds the [`WorkingSet`]: the single map that owns every
//! unit for the duration of a run. File units supply executable content,
//! ledger records supply applied state. Requirements are then resolved into
//! dependencies and the resulting relation is checked for cycles.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

use crate::error::{Error, Result};
use crate::migration::Migration;

/// Options controlling reconciliation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileOptions {
    /// Fail when the ledger records a unit that has no source file.
    pub strict_orphans: bool,
}

/// The authoritative set of units for one run, keyed by identity.
///
/// Dependencies are stored as identities and looked up here; the working
/// set is the only owner of units.
#[derive(Debug, Clone, Default)]
pub struct WorkingSet {
    units: BTreeMap<String, Migration>,
    orphans: Vec<Migration>,
    topological: Vec<String>,
}

impl WorkingSet {
    /// Looks up a unit by identity.
    #[must_use]
    pub fn get(&self, identity: &str) -> Option<&Migration> {
        self.units.get(identity)
    }

    pub(crate) fn get_mut(&mut self, identity: &str) -> Option<&mut Migration> {
        self.units.get_mut(identity)
    }

    /// Whether `identity` is part of the set.
    #[must_use]
    pub fn contains(&self, identity: &str) -> bool {
        self.units.contains_key(identity)
    }

    /// Number of units.
    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Whether the set has no units.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Iterates over units in identity order.
    pub fn iter(&self) -> impl Iterator<Item = &Migration> {
        self.units.values()
    }

    /// Every identity, in identity order.
    pub fn identities(&self) -> impl Iterator<Item = &str> {
        self.units.keys().map(String::as_str)
    }

    /// Ledger records with no matching source file.
    #[must_use]
    pub fn orphans(&self) -> &[Migration] {
        &self.orphans
    }

    /// Identities ordered so that every dependency precedes its dependents.
    #[must_use]
    pub fn topological_order(&self) -> &[String] {
        &self.topological
    }

    /// Applied units whose dependencies include `identity`.
    ///
    /// Orphaned records count too: their effect is still in the database,
    /// so they are matched on their recorded requirements.
    #[must_use]
    pub fn applied_dependents(&self, identity: &str) -> Vec<String> {
        let from_files = self
            .units
            .values()
            .filter(|unit| unit.dependencies().iter().any(|dep| dep == identity));
        let from_ledger = self
            .orphans
            .iter()
            .filter(|orphan| orphan.required_identities().iter().any(|req| req == identity));

        from_files
            .chain(from_ledger)
            .filter(|unit| unit.is_applied() && unit.identity() != identity)
            .map(|unit| unit.identity().to_string())
            .collect()
    }

    /// The next sequence number for the ledger's apply order.
    #[must_use]
    pub fn next_order(&self) -> i64 {
        self.units
            .values()
            .chain(self.orphans.iter())
            .filter_map(Migration::order_applied)
            .max()
            .map_or(1, |max| max + 1)
    }

    #[cfg(test)]
    pub(crate) fn insert_for_test(&mut self, unit: Migration) {
        self.topological.push(unit.identity().to_string());
        self.units.insert(unit.identity().to_string(), unit);
    }
}

/// Merges file units with ledger records and resolves dependencies.
///
/// # Errors
///
/// Returns an error if:
/// - a requirement names an identity absent from the file units
///   ([`Error::MissingDependency`])
/// - the requirement relation has a cycle ([`Error::DependencyCycle`])
/// - `strict_orphans` is set and the ledger holds a unit with no file
///   ([`Error::OrphanedRecord`])
///
/// # Examples
///
/// ```
/// use mango::migration::parse;
/// use mango::reconcile::{reconcile, ReconcileOptions};
///
/// let init = parse("CREATE TABLE t(id int);", "001_init.sql").unwrap();
/// let add = parse("--mango requires 001_init.sql\nALTER TABLE t ADD x int;", "002_add.sql").unwrap();
///
/// let set = reconcile(vec![init, add], Vec::new(), &ReconcileOptions::default()).unwrap();
/// assert_eq!(set.get("002_add.sql").unwrap().dependencies(), ["001_init.sql"]);
/// assert_eq!(set.topological_order(), ["001_init.sql", "002_add.sql"]);
/// ```
pub fn reconcile(
    file_units: Vec<Migration>,
    persisted_units: Vec<Migration>,
    options: &ReconcileOptions,
) -> Result<WorkingSet> {
    let mut units = BTreeMap::new();
    for unit in file_units {
        if let Some(previous) = units.insert(unit.identity().to_string(), unit) {
            log::warn!("duplicate migration {}, keeping the last one", previous.identity());
        }
    }

    let mut orphans = Vec::new();
    for recorded in persisted_units {
        match units.get_mut(recorded.identity()) {
            Some(unit) => {
                if recorded.is_applied() && recorded.up_body() != unit.up_body() {
                    log::warn!(
                        "migration {} changed on disk since it was applied",
                        unit.identity()
                    );
                }
                unit.merge_recorded_state(&recorded);
            }
            None => {
                if options.strict_orphans {
                    return Err(Error::OrphanedRecord {
                        identity: recorded.identity().to_string(),
                    });
                }
                log::warn!(
                    "migration {} is recorded in the ledger but has no source file",
                    recorded.identity()
                );
                orphans.push(recorded);
            }
        }
    }

    resolve_dependencies(&mut units)?;
    let topological = validate_acyclic(&units)?;

    Ok(WorkingSet {
        units,
        orphans,
        topological,
    })
}

/// Turns each unit's requirements into deduplicated, ordered dependencies.
fn resolve_dependencies(units: &mut BTreeMap<String, Migration>) -> Result<()> {
    let known: HashSet<String> = units.keys().cloned().collect();

    for unit in units.values_mut() {
        let mut seen = HashSet::new();
        let mut dependencies = Vec::new();
        for required in unit.required_identities() {
            if !known.contains(required) {
                return Err(Error::MissingDependency {
                    identity: unit.identity().to_string(),
                    required: required.clone(),
                });
            }
            if seen.insert(required.as_str()) {
                dependencies.push(required.clone());
            }
        }
        unit.set_dependencies(dependencies);
    }

    Ok(())
}

/// Checks the dependency relation for cycles and returns a dependency-first order.
fn validate_acyclic(units: &BTreeMap<String, Migration>) -> Result<Vec<String>> {
    // Edges point from a unit to each unit it requires.
    let mut graph: DiGraph<&str, ()> = DiGraph::new();
    let mut nodes: HashMap<&str, NodeIndex> = HashMap::new();

    for identity in units.keys() {
        nodes.insert(identity.as_str(), graph.add_node(identity.as_str()));
    }
    for unit in units.values() {
        let from = nodes[unit.identity()];
        for dependency in unit.dependencies() {
            graph.add_edge(from, nodes[dependency.as_str()], ());
        }
    }

    match toposort(&graph, None) {
        Ok(order) => Ok(order
            .into_iter()
            .rev()
            .map(|idx| graph[idx].to_string())
            .collect()),
        Err(cycle) => Err(Error::DependencyCycle {
            cycle: find_cycle_path(&graph, cycle.node_id()),
        }),
    }
}

/// Finds the shortest path from `start` back to itself for error reporting.
fn find_cycle_path(graph: &DiGraph<&str, ()>, start: NodeIndex) -> String {
    let mut parents: HashMap<NodeIndex, NodeIndex> = HashMap::new();
    let mut queue = VecDeque::from([start]);
    let mut closing = None;

    'search: while let Some(current) = queue.pop_front() {
        for edge in graph.edges(current) {
            let target = edge.target();
            if target == start {
                closing = Some(current);
                break 'search;
            }
            if !parents.contains_key(&target) {
                parents.insert(target, current);
                queue.push_back(target);
            }
        }
    }

    let mut path = vec![graph[start]];
    if let Some(mut node) = closing {
        let mut reversed = Vec::new();
        while node != start {
            reversed.push(graph[node]);
            node = parents[&node];
        }
        path.extend(reversed.into_iter().rev());
    }
    path.push(graph[start]);
    path.join(" -> ")
}
