use clap::Parser;
use log::{LevelFilter, debug};
use pipeline_viewer::Result;
use pipeline_viewer::cli::{self, Cli};
use std::str::FromStr;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = LevelFilter::from_str(&cli.log_level).unwrap_or_else(|_| {
        eprintln!("Invalid log level: {}. Using 'warn' instead.", cli.log_level);
        LevelFilter::Warn
    });
    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();

    debug!(args:? = cli; "Parsed arguments");

    cli::run(&cli)
}
