//! Graph assembly and stateless graph queries.

pub mod build;
pub mod filter;

pub use build::build_graph;
pub use filter::filter_by_step;
