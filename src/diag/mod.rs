//! Diagnostics text -> pipeline graph.
//!
//! The text goes through three passes before the graph is assembled:
//! - normalize: drop per-line log prefixes
//! - block: split into one chunk per `Step:` header
//! - field: read Description / Dependencies / Resource / Tags from each chunk

pub mod block;
pub mod field;
pub mod normalize;

pub use block::{StepBlock, extract_blocks};
pub use field::parse_step;
pub use normalize::normalize;

use crate::graph::build_graph;
use crate::model::{Graph, Step};
use log::debug;

/// Parse raw diagnostics output into a graph.
///
/// Never fails. Text without any step block yields a graph with the usual
/// fixed id and no steps or edges.
pub fn parse_diagnostics(text: &str) -> Graph {
    let normalized = normalize(text);
    let steps: Vec<Step> = extract_blocks(&normalized).iter().map(parse_step).collect();

    if steps.is_empty() {
        debug!("no step blocks found in diagnostics text");
    }

    build_graph(steps)
}
