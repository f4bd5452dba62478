//! autoissues CLI
//!
//! Builds Markdown documentation with issue references linked to the
//! configured issue tracker.

mod cli;
mod commands;
mod output;

use std::process::ExitCode;

use clap::Parser;
use miette::Result;
use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::cli::{CacheCommands, Cli, Commands};
use crate::commands::{run_build, run_cache_clean, run_refs};

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(has_errors) => {
            if has_errors {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            error!("{:?}", e);
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<bool> {
    match &cli.command {
        Commands::Build {
            srcdir,
            outdir,
            builder,
        } => run_build(&cli, srcdir, outdir, *builder),
        Commands::Refs { files, format } => run_refs(&cli, files, *format),
        Commands::Cache { command } => match command {
            CacheCommands::Clean => run_cache_clean().map(|_| false),
        },
    }
}
