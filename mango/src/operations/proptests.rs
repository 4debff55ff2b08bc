//! Property-based tests for dependency-ordered execution.
//!
//! Random acyclic requirement graphs are applied and reverted against an
//! in-memory target that records the order bodies ran in.

use std::collections::HashMap;

use proptest::prelude::*;

use super::{Migrator, RunOptions};
use crate::error::Result;
use crate::gateway::{MigrationStore, StatementExecutor};
use crate::migration::{parse, Migration};
use crate::reconcile::{reconcile, ReconcileOptions};

#[derive(Default)]
struct Journal {
    statements: Vec<String>,
}

impl StatementExecutor for Journal {
    fn execute(&mut self, statement: &str) -> Result<()> {
        self.statements.push(statement.trim_end().to_string());
        Ok(())
    }
}

impl MigrationStore for Journal {
    fn table_exists(&self) -> Result<bool> {
        Ok(true)
    }

    fn create_table(&mut self) -> Result<()> {
        Ok(())
    }

    fn list_records(&self) -> Result<Vec<Migration>> {
        Ok(Vec::new())
    }

    fn upsert_record(&mut self, _migration: &Migration) -> Result<()> {
        Ok(())
    }
}

fn name(index: usize) -> String {
    format!("{index:03}_unit.sql")
}

// Unit i may only require units with a lower index, so the graph is acyclic.
fn graph_strategy() -> impl Strategy<Value = Vec<Vec<usize>>> {
    (1usize..12).prop_flat_map(|count| {
        (0..count)
            .map(|i| prop::collection::vec(0..i.max(1), 0..=i.min(3)))
            .collect::<Vec<_>>()
    })
}

fn units(graph: &[Vec<usize>]) -> Vec<Migration> {
    graph
        .iter()
        .enumerate()
        .map(|(i, deps)| {
            let mut source = String::new();
            for dep in deps {
                source.push_str(&format!("--mango requires {}\n", name(*dep)));
            }
            source.push_str(&format!("up {i}\n--mango down\ndown {i}\n"));
            parse(&source, &name(i)).unwrap()
        })
        .collect()
}

fn positions(statements: &[String], prefix: &str) -> HashMap<usize, usize> {
    statements
        .iter()
        .enumerate()
        .filter_map(|(pos, s)| {
            s.strip_prefix(prefix)
                .and_then(|n| n.parse().ok())
                .map(|n| (n, pos))
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    // Applying everything runs each unit once, dependencies first
    #[test]
    fn apply_all_respects_dependencies(graph in graph_strategy()) {
        let mut set = reconcile(units(&graph), Vec::new(), &ReconcileOptions::default()).unwrap();
        let mut journal = Journal::default();

        let report = Migrator::new(&mut set, &mut journal).apply_all(&["*".to_string()]);
        prop_assert!(report.is_success());
        prop_assert_eq!(journal.statements.len(), graph.len());

        let order = positions(&journal.statements, "up ");
        for (i, deps) in graph.iter().enumerate() {
            for dep in deps {
                prop_assert!(order[dep] < order[&i]);
            }
        }
    }

    // Applying one unit runs exactly its transitive dependencies
    #[test]
    fn apply_one_runs_closure(graph in graph_strategy(), pick in any::<prop::sample::Index>()) {
        let target = pick.index(graph.len());
        let mut set = reconcile(units(&graph), Vec::new(), &ReconcileOptions::default()).unwrap();
        let mut journal = Journal::default();

        Migrator::new(&mut set, &mut journal).apply(&name(target)).unwrap();

        let mut closure = vec![false; graph.len()];
        let mut stack = vec![target];
        while let Some(i) = stack.pop() {
            if !closure[i] {
                closure[i] = true;
                stack.extend(graph[i].iter().copied());
            }
        }

        for (i, in_closure) in closure.iter().enumerate() {
            prop_assert_eq!(set.get(&name(i)).unwrap().is_applied(), *in_closure);
        }
    }

    // Dry runs plan the same units a real run applies
    #[test]
    fn dry_run_matches_real_run(graph in graph_strategy()) {
        let all = ["*".to_string()];

        let mut planned_set = reconcile(units(&graph), Vec::new(), &ReconcileOptions::default()).unwrap();
        let mut idle = Journal::default();
        let planned = Migrator::new(&mut planned_set, &mut idle)
            .with_options(RunOptions::default().with_dry_run(true))
            .apply_all(&all);
        prop_assert!(idle.statements.is_empty());

        let mut set = reconcile(units(&graph), Vec::new(), &ReconcileOptions::default()).unwrap();
        let mut journal = Journal::default();
        let real = Migrator::new(&mut set, &mut journal).apply_all(&all);

        prop_assert_eq!(planned.completed, real.completed);
    }

    // Reverting everything runs dependents before their dependencies
    #[test]
    fn revert_all_respects_dependents(graph in graph_strategy()) {
        let mut set = reconcile(units(&graph), Vec::new(), &ReconcileOptions::default()).unwrap();
        let mut journal = Journal::default();
        let all = ["all".to_string()];

        Migrator::new(&mut set, &mut journal).apply_all(&all);
        journal.statements.clear();

        let report = Migrator::new(&mut set, &mut journal).revert_all(&all);
        prop_assert!(report.is_success());
        prop_assert!(set.iter().all(|u| !u.is_applied()));

        let order = positions(&journal.statements, "down ");
        for (i, deps) in graph.iter().enumerate() {
            for dep in deps {
                prop_assert!(order[&i] < order[dep]);
            }
        }
    }
}
