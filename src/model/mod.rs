//! Pipeline value types: steps, edges and the graph that owns them.
//!
//! These are built once per parse and never mutated afterwards. Optional
//! fields stay `None` when the diagnostics text did not mention them, which is
//! different from an explicitly empty value (`Dependencies: none` parses to
//! `Some(vec![])`).

use serde::{Deserialize, Serialize};

/// Id and name given to every graph produced by the parser.
pub const DEFAULT_GRAPH_ID: &str = "aspire-pipeline";

/// Execution state of a step, when known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStatus {
    Pending,
    Running,
    Success,
    Failed,
    Skipped,
}

impl ExecutionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Success => "success",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Step {
    pub id: String,
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Ordered, de-duplicated ids of the steps this one waits for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<Vec<String>>,

    /// Raw resource descriptor, e.g. `app (ExecutableContainerResource)`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ExecutionStatus>,
}

/// How the layout treats a step.
///
/// A step bound to a resource lives in that resource's column; a step with no
/// resource is an aggregator that gates other steps from the center lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind<'a> {
    Resource(&'a str),
    Aggregator,
}

impl Step {
    /// A step whose id doubles as its display name.
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            ..Self::default()
        }
    }

    pub fn kind(&self) -> StepKind<'_> {
        match self.resource.as_deref() {
            Some(resource) if !resource.is_empty() => StepKind::Resource(resource),
            _ => StepKind::Aggregator,
        }
    }

    pub fn is_aggregator(&self) -> bool {
        matches!(self.kind(), StepKind::Aggregator)
    }

    /// Dependencies as a slice; absent and empty look the same here.
    pub fn deps(&self) -> &[String] {
        self.dependencies.as_deref().unwrap_or(&[])
    }
}

/// Directed relation `source -> target`: target depends on source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
}

impl Edge {
    /// Build an edge whose id is derived from its endpoints.
    pub fn between(source: &str, target: &str) -> Self {
        Self {
            id: format!("e-{source}-{target}"),
            source: source.to_string(),
            target: target.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Graph {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Steps in first-seen order.
    pub steps: Vec<Step>,
    pub edges: Vec<Edge>,
}

impl Graph {
    /// First step carrying `id`, if any.
    pub fn step(&self, id: &str) -> Option<&Step> {
        self.steps.iter().find(|s| s.id == id)
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn step_without_resource_is_aggregator() {
        let mut step = Step::new("build");
        assert!(step.is_aggregator());

        step.resource = Some(String::new());
        assert_eq!(step.kind(), StepKind::Aggregator);

        step.resource = Some("app (Container)".to_string());
        assert_eq!(step.kind(), StepKind::Resource("app (Container)"));
    }

    #[test]
    fn edge_id_is_derived_from_endpoints() {
        let edge = Edge::between("build-prereq", "build-app");
        assert_eq!(edge.id, "e-build-prereq-build-app");
        assert_eq!(edge, Edge::between("build-prereq", "build-app"));
    }

    #[test]
    fn unset_fields_are_omitted_from_json() {
        let mut step = Step::new("test");
        step.dependencies = Some(vec![]);
        step.status = Some(ExecutionStatus::Skipped);

        let json = serde_json::to_value(&step).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "test",
                "name": "test",
                "dependencies": [],
                "status": "skipped",
            })
        );
    }
}
