use crate::model::{DEFAULT_GRAPH_ID, Edge, Graph, Step};
use log::debug;

/// Assemble a graph from parsed steps.
///
/// One edge `dependency -> step` is synthesized per listed dependency.
/// Dependency names are not checked against the known steps, so an edge may
/// point at an id that has no step of its own.
pub fn build_graph(steps: Vec<Step>) -> Graph {
    let mut edges: Vec<Edge> = Vec::new();
    for step in &steps {
        for dep in step.deps() {
            if dep.is_empty() || dep.eq_ignore_ascii_case("none") {
                continue;
            }
            edges.push(Edge::between(dep, &step.id));
        }
    }

    debug!(steps = steps.len(), edges = edges.len(); "built pipeline graph");

    Graph {
        id: DEFAULT_GRAPH_ID.to_string(),
        name: Some(DEFAULT_GRAPH_ID.to_string()),
        steps,
        edges,
    }
}
