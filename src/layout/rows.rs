//! Row assignment: depth refined around aggregator placement.

use crate::layout::columns::StepGroups;
use crate::layout::index_steps;
use crate::model::{Graph, Step};
use log::{trace, warn};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Upper bound on ordering passes; only malformed or cyclic input gets there.
pub const MAX_ORDERING_PASSES: usize = 100;

/// Final row of every step, split by step kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RowAssignments {
    pub step_rows: BTreeMap<String, usize>,
    pub aggregator_rows: BTreeMap<String, usize>,
}

impl RowAssignments {
    /// Rows straight from depth, for graphs without aggregators.
    pub fn from_depths(groups: &StepGroups<'_>, depths: &BTreeMap<String, usize>) -> Self {
        let step_rows = groups
            .resource_steps()
            .map(|s| (s.id.clone(), depths.get(&s.id).copied().unwrap_or(0)))
            .collect();
        Self {
            step_rows,
            aggregator_rows: BTreeMap::new(),
        }
    }

    pub fn row(&self, id: &str) -> Option<usize> {
        self.step_rows
            .get(id)
            .or_else(|| self.aggregator_rows.get(id))
            .copied()
    }

    pub fn max_row(&self) -> Option<usize> {
        self.step_rows
            .values()
            .chain(self.aggregator_rows.values())
            .copied()
            .max()
    }
}

/// Assign rows when aggregators are present.
///
/// 1. Every aggregator sits one row below everything it depends on.
/// 2. A resource step feeding aggregators is pulled up to just above the
///    earliest of them; other resource steps keep their depth.
/// 3. An ordering pass then pushes any step down until it is below all of its
///    known dependencies, aggregators included.
///
/// The ordering pass deliberately covers aggregators and their dependencies
/// as well as resource steps, so an aggregator pushed down by a moved
/// resource step still ends strictly below everything it depends on.
pub fn assign_rows(
    graph: &Graph,
    groups: &StepGroups<'_>,
    depths: &BTreeMap<String, usize>,
) -> RowAssignments {
    let index = index_steps(graph);
    let aggregators: HashMap<&str, &Step> = groups
        .aggregators
        .iter()
        .map(|s| (s.id.as_str(), *s))
        .collect();

    // Which aggregators consume each resource step.
    let mut consumers: HashMap<&str, Vec<&str>> = HashMap::new();
    for agg in &groups.aggregators {
        for dep in agg.deps() {
            if index.get(dep.as_str()).is_some_and(|s| !s.is_aggregator()) {
                consumers.entry(dep.as_str()).or_default().push(agg.id.as_str());
            }
        }
    }

    let mut aggregator_rows: HashMap<&str, usize> = HashMap::new();
    for agg in &groups.aggregators {
        aggregator_row(*agg, &aggregators, depths, &mut aggregator_rows, &HashSet::new());
    }

    let mut rows: HashMap<&str, usize> = aggregator_rows.clone();
    for step in groups.resource_steps() {
        let row = match consumers.get(step.id.as_str()) {
            Some(aggs) => aggs
                .iter()
                .filter_map(|a| aggregator_rows.get(a))
                .min()
                .map_or(0, |row| row.saturating_sub(1)),
            None => depths.get(&step.id).copied().unwrap_or(0),
        };
        rows.insert(step.id.as_str(), row);
    }

    enforce_ordering(graph, &mut rows);

    let mut assignments = RowAssignments::default();
    for step in groups.resource_steps() {
        assignments
            .step_rows
            .insert(step.id.clone(), rows[step.id.as_str()]);
    }
    for agg in &groups.aggregators {
        assignments
            .aggregator_rows
            .insert(agg.id.clone(), rows[agg.id.as_str()]);
    }
    assignments
}

/// Row of an aggregator, memoized. `visited` holds the aggregators on the
/// current path; meeting one again counts as row 0.
fn aggregator_row<'g>(
    agg: &'g Step,
    aggregators: &HashMap<&'g str, &'g Step>,
    depths: &BTreeMap<String, usize>,
    memo: &mut HashMap<&'g str, usize>,
    visited: &HashSet<&'g str>,
) -> usize {
    let id = agg.id.as_str();
    if let Some(&row) = memo.get(id) {
        return row;
    }
    if visited.contains(id) {
        return 0;
    }
    let mut path = visited.clone();
    path.insert(id);

    let mut deepest_agg: Option<usize> = None;
    let mut deepest_other = 0;
    for dep in agg.deps() {
        match aggregators.get(dep.as_str()) {
            Some(&dep_agg) => {
                let row = aggregator_row(dep_agg, aggregators, depths, memo, &path);
                deepest_agg = Some(deepest_agg.map_or(row, |d| d.max(row)));
            }
            None => {
                deepest_other = deepest_other.max(depths.get(dep).copied().unwrap_or(0));
            }
        }
    }

    let row = match deepest_agg {
        Some(agg_row) => (agg_row + 1).max(deepest_other + 1),
        None => deepest_other + 1,
    };
    memo.insert(id, row);
    row
}

/// Push steps below their dependencies until nothing moves or the pass
/// budget runs out.
fn enforce_ordering<'g>(graph: &'g Graph, rows: &mut HashMap<&'g str, usize>) {
    for pass in 1..=MAX_ORDERING_PASSES {
        let mut changed = false;
        for step in &graph.steps {
            for dep in step.deps() {
                let (Some(&dep_row), Some(&row)) =
                    (rows.get(dep.as_str()), rows.get(step.id.as_str()))
                else {
                    continue;
                };
                if row <= dep_row {
                    rows.insert(step.id.as_str(), dep_row + 1);
                    changed = true;
                }
            }
        }

        if !changed {
            trace!(passes = pass; "row ordering converged");
            return;
        }
    }
    warn!(
        passes = MAX_ORDERING_PASSES;
        "row ordering did not converge, dependency graph is probably cyclic"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::build_graph;
    use crate::layout::columns::group_steps;
    use crate::layout::depth::compute_depths;
    use pretty_assertions::assert_eq;

    fn step(id: &str, resource: Option<&str>, deps: &[&str]) -> Step {
        let mut s = Step::new(id);
        s.resource = resource.map(str::to_string);
        s.dependencies = Some(deps.iter().map(|d| d.to_string()).collect());
        s
    }

    fn rows_for(graph: &Graph) -> RowAssignments {
        let groups = group_steps(graph);
        assign_rows(graph, &groups, &compute_depths(graph))
    }

    #[test]
    fn aggregator_goes_below_independent_steps() {
        let graph = build_graph(vec![
            step("step-1", Some("app (Container)"), &[]),
            step("step-2", Some("db (Database)"), &[]),
            step("agg-1", None, &["step-1", "step-2"]),
        ]);
        let rows = rows_for(&graph);

        assert_eq!(rows.aggregator_rows["agg-1"], 1);
        assert_eq!(rows.step_rows["step-1"], 0);
        assert_eq!(rows.step_rows["step-2"], 0);
    }

    #[test]
    fn feeding_step_is_pulled_up_to_its_aggregator() {
        // `late` has depth 0 but only feeds `gate`, which waits on a chain of
        // three; it moves down to sit right above `gate`.
        let graph = build_graph(vec![
            step("a", Some("app"), &[]),
            step("b", Some("app"), &["a"]),
            step("c", Some("app"), &["b"]),
            step("late", Some("db"), &[]),
            step("gate", None, &["c", "late"]),
        ]);
        let rows = rows_for(&graph);

        assert_eq!(rows.aggregator_rows["gate"], 3);
        assert_eq!(rows.step_rows["late"], 2);
        assert_eq!(rows.step_rows["c"], 2);
    }

    #[test]
    fn chained_aggregators_stack() {
        let graph = build_graph(vec![
            step("x", Some("app"), &[]),
            step("first", None, &["x"]),
            step("second", None, &["first"]),
        ]);
        let rows = rows_for(&graph);

        assert_eq!(rows.aggregator_rows["first"], 1);
        assert_eq!(rows.aggregator_rows["second"], 2);
    }

    #[test]
    fn every_step_ends_below_its_dependencies() {
        let graph = build_graph(vec![
            step("build", None, &["build-app", "build-frontend"]),
            step("build-app", Some("app (C)"), &["build-prereq"]),
            step("build-frontend", Some("frontend (C)"), &["build-prereq"]),
            step("build-prereq", None, &[]),
            step("x", Some("app"), &[]),
            step("y", Some("app"), &["x"]),
            step("gate", None, &["x", "y"]),
        ]);
        let rows = rows_for(&graph);

        for s in &graph.steps {
            for d in s.deps() {
                assert!(rows.row(&s.id).unwrap() > rows.row(d).unwrap(), "{} vs {d}", s.id);
            }
        }
        assert_eq!(rows.max_row(), Some(3));
    }

    #[test]
    fn cyclic_input_terminates() {
        let graph = build_graph(vec![
            step("a", Some("app"), &["b"]),
            step("b", Some("app"), &["a"]),
            step("gate", None, &["a"]),
        ]);
        let rows = rows_for(&graph);
        assert_eq!(rows.step_rows.len(), 2);
        assert!(rows.aggregator_rows.contains_key("gate"));
    }
}
