use crate::error::PipelineError;
use crate::model::Graph;
use std::collections::{HashSet, VecDeque};

/// Restrict a graph to one step and everything it transitively depends on.
///
/// Steps keep their original order; only edges with both ends inside the
/// closure survive. Id and name are carried over unchanged.
pub fn filter_by_step(graph: &Graph, step_id: &str) -> Result<Graph, PipelineError> {
    if graph.step(step_id).is_none() {
        return Err(PipelineError::StepNotFound(step_id.to_string()));
    }

    let mut included: HashSet<&str> = HashSet::new();
    let mut queue: VecDeque<&str> = VecDeque::from([step_id]);

    while let Some(current) = queue.pop_front() {
        if !included.insert(current) {
            continue;
        }
        if let Some(step) = graph.step(current) {
            queue.extend(step.deps().iter().map(String::as_str));
        }
    }

    Ok(Graph {
        id: graph.id.clone(),
        name: graph.name.clone(),
        steps: graph
            .steps
            .iter()
            .filter(|s| included.contains(s.id.as_str()))
            .cloned()
            .collect(),
        edges: graph
            .edges
            .iter()
            .filter(|e| included.contains(e.source.as_str()) && included.contains(e.target.as_str()))
            .cloned()
            .collect(),
    })
}
