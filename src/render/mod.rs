//! Graph output: structured JSON, a plain-text summary and the HTML report.

pub mod html;

pub use html::{ReportData, build_report_data, render_html_report};

use crate::error::PipelineError;
use crate::graph::filter_by_step;
use crate::model::Graph;
use std::borrow::Cow;
use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Text,
}

/// Render `graph`, optionally narrowed to one step and its dependency chain.
///
/// Fails only when `step_filter` names a step the graph does not contain.
pub fn format_graph(
    graph: &Graph,
    format: OutputFormat,
    step_filter: Option<&str>,
) -> Result<String, PipelineError> {
    let graph = match step_filter.filter(|s| !s.is_empty()) {
        Some(step) => Cow::Owned(filter_by_step(graph, step)?),
        None => Cow::Borrowed(graph),
    };

    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&*graph)?),
        OutputFormat::Text => Ok(format_text(&graph)),
    }
}

fn format_text(graph: &Graph) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_text(graph, &mut out);
    out
}

fn write_text(graph: &Graph, out: &mut String) -> std::fmt::Result {
    writeln!(out)?;
    writeln!(out, "📊 Pipeline: {}", graph.display_name())?;
    writeln!(out, "ID: {}", graph.id)?;
    writeln!(out, "Steps: {}", graph.steps.len())?;
    writeln!(out, "Edges: {}", graph.edges.len())?;
    writeln!(out)?;

    writeln!(out, "Steps:")?;
    for step in &graph.steps {
        writeln!(out, "  • {} ({})", step.name, step.id)?;
        if let Some(description) = step.description.as_deref().filter(|d| !d.is_empty()) {
            writeln!(out, "    Description: {description}")?;
        }
        if let Some(resource) = step.resource.as_deref().filter(|r| !r.is_empty()) {
            writeln!(out, "    Resource: {resource}")?;
        }
        if !step.deps().is_empty() {
            writeln!(out, "    Dependencies: {}", step.deps().join(", "))?;
        }
        if let Some(tags) = step.tags.as_deref().filter(|t| !t.is_empty()) {
            writeln!(out, "    Tags: {}", tags.join(", "))?;
        }
        if let Some(status) = step.status {
            writeln!(out, "    Status: {}", status.as_str())?;
        }
    }
    Ok(())
}
