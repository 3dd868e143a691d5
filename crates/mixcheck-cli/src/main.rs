//! mixcheck CLI tool.
//!
//! Usage:
//! ```bash
//! mixcheck check [OPTIONS] [DUMP...]
//! mixcheck rules <PACKAGE>
//! mixcheck validate
//! mixcheck init
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;

/// Checks packages for forbidden struct and call usages
#[derive(Parser)]
#[command(name = "mixcheck")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "MIXCHECK_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check syntax dumps against the configured rules
    Check {
        /// Syntax dump files or directories containing them
        #[arg(default_value = "mixcheck-dump.json")]
        dumps: Vec<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Number of worker threads (overrides `analyzer.parallelism`)
        #[arg(short, long)]
        jobs: Option<usize>,

        /// Exclude package globs (can be specified multiple times)
        #[arg(short, long)]
        exclude: Vec<String>,
    },

    /// Show the effective rules for a package
    Rules {
        /// Package path, e.g. `a/c`
        package: String,
    },

    /// Validate the configuration without checking anything
    Validate,

    /// Initialize configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

/// Output format for check results.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output.
    Json,
    /// One-line-per-hit compact format.
    Compact,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let source = config_resolver::resolve(Path::new("."), cli.config.as_deref());

    match cli.command {
        Commands::Check {
            dumps,
            format,
            jobs,
            exclude,
        } => commands::check::run(&dumps, format, jobs, exclude, &source),
        Commands::Rules { package } => commands::rules::run(&package, &source),
        Commands::Validate => commands::validate::run(&source),
        Commands::Init { force } => commands::init::run(force),
    }
}
