//! Where diagnostics text comes from, plus input validation for step names.

use crate::error::PipelineError;
use log::debug;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// File read from a directory by [`DirectoryDiagnostics`].
pub const DIAGNOSTICS_FILE_NAME: &str = "diagnostics.txt";

/// Longest step name accepted by [`validate_step_name`].
pub const MAX_STEP_NAME_LEN: usize = 100;

/// Anything that can hand over raw diagnostics text.
pub trait DiagnosticsProvider {
    fn diagnostics(&self) -> Result<String, PipelineError>;

    /// Human-readable origin, used in log lines.
    fn describe(&self) -> String;
}

/// Diagnostics stored in an explicit file.
#[derive(Debug, Clone)]
pub struct FileDiagnostics {
    pub path: PathBuf,
}

impl FileDiagnostics {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DiagnosticsProvider for FileDiagnostics {
    fn diagnostics(&self) -> Result<String, PipelineError> {
        read_diagnostics(&self.path)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Diagnostics saved as `diagnostics.txt` inside a project directory.
#[derive(Debug, Clone)]
pub struct DirectoryDiagnostics {
    pub dir: PathBuf,
}

impl DirectoryDiagnostics {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn file_path(&self) -> PathBuf {
        self.dir.join(DIAGNOSTICS_FILE_NAME)
    }
}

impl DiagnosticsProvider for DirectoryDiagnostics {
    fn diagnostics(&self) -> Result<String, PipelineError> {
        validate_directory(&self.dir)?;
        read_diagnostics(&self.file_path())
    }

    fn describe(&self) -> String {
        self.file_path().display().to_string()
    }
}

fn read_diagnostics(path: &Path) -> Result<String, PipelineError> {
    if !path.is_file() {
        return Err(PipelineError::MissingInput(format!(
            "Diagnostics file not found: {}",
            path.display()
        )));
    }
    let text = fs::read_to_string(path)?;
    debug!(path:? = path, bytes = text.len(); "read diagnostics");
    Ok(text)
}

/// Check that `dir` names an existing directory.
pub fn validate_directory(dir: &Path) -> Result<(), PipelineError> {
    if dir.as_os_str().is_empty() {
        return Err(PipelineError::MissingInput(
            "Directory path must be a non-empty string".to_string(),
        ));
    }
    match fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(PipelineError::MissingInput(format!(
            "Path is not a directory: {}",
            dir.display()
        ))),
        Err(_) => Err(PipelineError::MissingInput(format!(
            "Directory does not exist or is not accessible: {}",
            dir.display()
        ))),
    }
}

fn step_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9._-]+$").expect("step name regex"))
}

/// Accept only ids made of ASCII letters, digits, `.`, `_` and `-`, at most
/// [`MAX_STEP_NAME_LEN`] characters long.
pub fn validate_step_name(name: &str) -> Result<(), PipelineError> {
    let invalid = |reason: &str| PipelineError::InvalidStepName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if name.is_empty() {
        return Err(invalid("step name must not be empty"));
    }
    if !step_name_re().is_match(name) {
        return Err(invalid(
            "only alphanumeric characters, dots, hyphens and underscores are allowed",
        ));
    }
    if name.len() > MAX_STEP_NAME_LEN {
        return Err(invalid("step name is too long (max 100 characters)"));
    }
    Ok(())
}
