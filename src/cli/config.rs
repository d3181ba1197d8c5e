//! Configuration file loading for the CLI.
//!
//! An explicit `--config` path wins; otherwise `pipeline-viewer.toml` in the
//! working directory is used when present, and built-in defaults apply when
//! neither exists.

use crate::error::PipelineError;
use crate::layout::LayoutConfig;

use log::{debug, info};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Looked up in the working directory when no path is given.
pub const LOCAL_CONFIG_FILE: &str = "pipeline-viewer.toml";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub layout: LayoutConfig,
}

/// Find and load the configuration.
///
/// # Errors
///
/// Returns [`PipelineError::Config`] if an explicit path does not exist or a
/// config file cannot be parsed.
pub fn load_config(explicit_path: Option<&Path>) -> Result<Config, PipelineError> {
    if let Some(path) = explicit_path {
        info!(path:? = path; "Loading configuration from explicit path");
        if !path.exists() {
            return Err(PipelineError::Config(format!(
                "Missing configuration file: {}",
                path.display()
            )));
        }
        return load_config_file(path);
    }

    let local = Path::new(LOCAL_CONFIG_FILE);
    if local.exists() {
        info!(path:? = local; "Loading configuration from local path");
        return load_config_file(local);
    }

    debug!("No configuration file found, using default configuration");
    Ok(Config::default())
}

fn load_config_file(path: &Path) -> Result<Config, PipelineError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

pub fn parse_config(content: &str) -> Result<Config, PipelineError> {
    toml::from_str(content).map_err(|err| {
        PipelineError::Config(format!("Failed to parse TOML configuration: {err}"))
    })
}
