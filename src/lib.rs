//! Pipeline diagnostics viewer.
//!
//! Turns the plain-text diagnostics dump of a pipeline tool into a step graph
//! and computes a deterministic column layout for drawing it.
//!
//! ```
//! use pipeline_viewer::{LayoutConfig, compute_layout, parse_diagnostics};
//!
//! let graph = parse_diagnostics("Step: build\n  Dependencies: none\n");
//! let layout = compute_layout(&graph, &LayoutConfig::default());
//! assert!(layout.positions.contains_key("build"));
//! ```

pub mod cli;
pub mod diag;
pub mod error;
pub mod graph;
pub mod layout;
pub mod model;
pub mod render;
pub mod source;

pub use diag::parse_diagnostics;
pub use error::PipelineError;
pub use graph::{build_graph, filter_by_step};
pub use layout::{LayoutConfig, LayoutResult, compute_layout, resource_color, wrap_step_name};
pub use model::{Edge, ExecutionStatus, Graph, Step, StepKind};
pub use render::{OutputFormat, format_graph};

pub type Result<T> = anyhow::Result<T>;
