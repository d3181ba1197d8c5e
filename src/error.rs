//! Error type shared by the library entry points.

use std::io;

use thiserror::Error;

/// Failures surfaced by the pipeline viewer.
///
/// Parsing never fails: text without recognizable step blocks becomes an
/// empty graph and unparseable field entries are dropped. The variants here
/// cover caller mistakes (an unknown or malformed step id) and the I/O and
/// configuration plumbing around the core.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Step not found: {0}")]
    StepNotFound(String),

    #[error("Invalid step name {name:?}: {reason}")]
    InvalidStepName { name: String, reason: String },

    #[error("Missing input: {0}")]
    MissingInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}
