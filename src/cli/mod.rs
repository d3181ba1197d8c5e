//! CLI logic: resolve the diagnostics source, run one subcommand, write the
//! result to stdout or a file.

mod args;
pub mod config;

pub use args::{Cli, Commands, InputArgs};
pub use config::{Config, load_config};

use crate::Result;
use crate::diag::parse_diagnostics;
use crate::error::PipelineError;
use crate::graph::filter_by_step;
use crate::layout::compute_layout;
use crate::model::Graph;
use crate::render::{build_report_data, format_graph, render_html_report};
use crate::source::{
    DiagnosticsProvider, DirectoryDiagnostics, FileDiagnostics, validate_step_name,
};

use anyhow::Context;
use log::info;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;

/// Run one CLI invocation.
///
/// # Errors
///
/// Fails on missing or unreadable input, an invalid or unknown `--step`, a
/// bad config file, or when the output cannot be written.
pub fn run(cli: &Cli) -> Result<()> {
    match &cli.cmd {
        Commands::Analyze {
            input,
            json: _,
            text,
            step,
            out,
        } => {
            let graph = load_graph(input)?;
            let output = format_graph(&graph, args::output_format(*text), step.as_deref())
                .map_err(|err| explain_lookup(err, step.as_deref()))?;
            write_output(out.as_deref(), &output)?;
        }

        Commands::Layout {
            input,
            step,
            config,
            out,
        } => {
            let app_config = load_config(config.as_deref())?;
            let graph = narrow(load_graph(input)?, step.as_deref())?;
            let layout = compute_layout(&graph, &app_config.layout);
            let json = serde_json::to_string_pretty(&layout)?;
            write_output(out.as_deref(), &json)?;
        }

        Commands::Report {
            input,
            step,
            config,
            out,
        } => {
            let app_config = load_config(config.as_deref())?;
            let graph = narrow(load_graph(input)?, step.as_deref())?;
            let layout = compute_layout(&graph, &app_config.layout);
            let html = render_html_report(&build_report_data(&graph, &layout))?;
            fs::write(out, html).with_context(|| format!("writing {}", out.display()))?;
            println!("Wrote {}", out.display());
        }
    }

    Ok(())
}

fn load_graph(input: &InputArgs) -> Result<Graph> {
    let stdin = io::stdin();
    let provider = resolve_provider(input, &mut stdin.lock())?;
    info!(source = provider.describe(); "Reading diagnostics");

    let text = provider.diagnostics()?;
    let graph = parse_diagnostics(&text);
    info!(steps = graph.steps.len(), edges = graph.edges.len(); "Parsed pipeline");
    Ok(graph)
}

fn narrow(graph: Graph, step: Option<&str>) -> Result<Graph> {
    match step {
        Some(step) => {
            Ok(filter_by_step(&graph, step).map_err(|err| explain_lookup(err, Some(step)))?)
        }
        None => Ok(graph),
    }
}

/// A `--step` that matches nothing is reported as malformed when it could
/// never be a step name, and as not found otherwise. Any id the parser
/// produced is accepted for lookup.
fn explain_lookup(err: PipelineError, step: Option<&str>) -> PipelineError {
    match (err, step) {
        (err @ PipelineError::StepNotFound(_), Some(step)) => {
            validate_step_name(step).err().unwrap_or(err)
        }
        (err, _) => err,
    }
}

/// Pick the diagnostics source from the flags, prompting on `reader` when
/// neither `-d` nor `-C` was given and prompting is allowed.
pub fn resolve_provider(
    input: &InputArgs,
    reader: &mut impl BufRead,
) -> Result<Box<dyn DiagnosticsProvider>> {
    if let Some(path) = &input.diagnostics {
        return Ok(Box::new(FileDiagnostics::new(path)));
    }
    if let Some(dir) = &input.directory {
        return Ok(Box::new(DirectoryDiagnostics::new(dir)));
    }
    if input.no_interactive {
        return Err(PipelineError::MissingInput(
            "either --diagnostics or --directory is required with --no-interactive".to_string(),
        )
        .into());
    }

    eprintln!("Pipeline Viewer - interactive mode");
    let choice = prompt(reader, "Parse from file (f) or directory (d)? [f/d]: ")?;
    if choice.eq_ignore_ascii_case("d") {
        let dir = prompt(reader, "Project directory path: ")?;
        if dir.is_empty() {
            return Err(PipelineError::MissingInput("no directory given".to_string()).into());
        }
        return Ok(Box::new(DirectoryDiagnostics::new(dir)));
    }

    let path = prompt(reader, "Path to diagnostics file: ")?;
    if path.is_empty() {
        return Err(PipelineError::MissingInput("no diagnostics file given".to_string()).into());
    }
    Ok(Box::new(FileDiagnostics::new(path)))
}

fn prompt(reader: &mut impl BufRead, question: &str) -> Result<String> {
    eprint!("{question}");
    io::stderr().flush()?;
    let mut answer = String::new();
    reader.read_line(&mut answer)?;
    Ok(answer.trim().to_string())
}

fn write_output(out: Option<&Path>, content: &str) -> Result<()> {
    match out {
        Some(path) => {
            fs::write(path, content).with_context(|| format!("writing {}", path.display()))?;
            info!(path:? = path; "Wrote output");
        }
        None => println!("{content}"),
    }
    Ok(())
}
