//! Command-line argument definitions.

use crate::render::OutputFormat;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pipeline-viewer", version)]
#[command(about = "Inspect and lay out pipeline diagnostics", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Commands,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse diagnostics and print the pipeline graph.
    Analyze {
        #[command(flatten)]
        input: InputArgs,

        /// Output as JSON (default)
        #[arg(long, conflicts_with = "text")]
        json: bool,

        /// Output as human-readable text
        #[arg(long)]
        text: bool,

        /// Only show this step and everything it depends on
        #[arg(long)]
        step: Option<String>,

        #[arg(short = 'o', long)]
        out: Option<PathBuf>,
    },

    /// Compute the graph layout and print it as JSON.
    Layout {
        #[command(flatten)]
        input: InputArgs,

        /// Lay out only this step and its dependency chain
        #[arg(long)]
        step: Option<String>,

        /// Path to configuration file (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        #[arg(short = 'o', long)]
        out: Option<PathBuf>,
    },

    /// Write a self-contained HTML report drawing the pipeline.
    Report {
        #[command(flatten)]
        input: InputArgs,

        #[arg(long)]
        step: Option<String>,

        #[arg(short, long)]
        config: Option<PathBuf>,

        #[arg(short = 'o', long)]
        out: PathBuf,
    },
}

/// Where to read diagnostics from.
#[derive(Args, Debug, Clone, Default)]
pub struct InputArgs {
    /// Path to diagnostics file
    #[arg(short = 'd', long, conflicts_with = "directory")]
    pub diagnostics: Option<PathBuf>,

    /// Project directory holding diagnostics.txt
    #[arg(short = 'C', long)]
    pub directory: Option<PathBuf>,

    /// Fail instead of prompting when no input is given
    #[arg(long)]
    pub no_interactive: bool,
}

/// `--text` wins; JSON otherwise.
pub fn output_format(text: bool) -> OutputFormat {
    if text {
        OutputFormat::Text
    } else {
        OutputFormat::Json
    }
}
