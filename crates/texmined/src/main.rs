//! Command line interface for mining arXiv LaTeX sources with `texmine`.
//!
//! It supports three operations:
//! - Downloading source bundles for a roster of papers and writing one clean
//!   text artifact per paper, plus a run summary
//! - Enriching a JSON list of papers with metadata mined from their sources
//! - Inspecting a local bundle or directory without touching the network
//!
//! # Usage
//!
//! ```bash
//! # Extract bodies for every paper in a roster
//! texmine download scored_papers_summary.json --output-dir data/papers
//!
//! # Attach title/authors/keywords/abstract/introduction to a paper list
//! texmine enrich filtered_papers.json
//!
//! # Look at what would be extracted from a local bundle
//! texmine inspect 2301.07041.tar.gz --body
//! ```
//!
//! Logging goes to stderr and is controlled with `-v` (repeatable) or
//! `RUST_LOG`.

#![warn(missing_docs, clippy::missing_docs_in_private_items)]

use std::path::{Path, PathBuf};

use clap::{builder::ArgAction, Args, Parser, Subcommand};
use console::style;
use texmine::{config::Config, error::TexmineError};
use tracing::{debug, trace};
use tracing_subscriber::EnvFilter;

pub mod commands;
pub mod error;

use crate::{commands::*, error::*};

/// Prefix for information messages
static INFO_PREFIX: &str = "ℹ ";
/// Prefix for success messages
static SUCCESS_PREFIX: &str = "✓ ";
/// Prefix for warning messages
static WARNING_PREFIX: &str = "⚠️ ";
/// Prefix for error messages
static ERROR_PREFIX: &str = "✗ ";

/// Command line interface configuration and argument parsing
#[derive(Parser)]
#[command(author, version, about = "Mine arXiv LaTeX source bundles for metadata and body text")]
pub struct Cli {
  /// Verbose mode (-v, -vv, -vvv) for different levels of logging detail
  #[arg(
        short,
        long,
        action = ArgAction::Count,
        global = true,
        help = "Increase logging verbosity"
    )]
  verbose: u8,

  /// Path to the configuration file. If not specified, uses the default
  /// platform-specific config directory; a missing file means defaults.
  #[arg(long, short, global = true)]
  config: Option<PathBuf>,

  /// The subcommand to execute
  #[command(subcommand)]
  command: Commands,
}

/// Configures the logging system based on the verbosity level
///
/// # Arguments
///
/// * `verbosity` - Number of times the verbose flag was used
///
/// The verbosity levels are:
/// - 0: error (default)
/// - 1: warn
/// - 2: info
/// - 3: debug
/// - 4+: trace
fn setup_logging(verbosity: u8) {
  let filter = match verbosity {
    0 => "error",
    1 => "warn",
    2 => "info",
    3 => "debug",
    _ => "trace",
  };

  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_file(true)
    .with_line_number(true)
    .with_thread_ids(true)
    .with_target(true)
    .init();
}

/// Loads the configuration named on the command line, or the default one.
fn load_config(path: Option<&Path>) -> Result<Config> {
  let path = path.map(Path::to_path_buf).unwrap_or_else(Config::default_path);
  debug!("Loading configuration from {}", path.display());
  Config::load(&path).map_err(|e| {
    eprintln!(
      "{} Invalid configuration at {}: {}",
      style(ERROR_PREFIX).red(),
      style(path.display()).yellow(),
      e
    );
    TexminedError::from(e)
  })
}

/// Entry point for the texmine CLI application
///
/// Parses arguments, sets up logging, loads the configuration and runs the
/// requested command.
///
/// # Errors
///
/// Returns [`TexminedError`] for run-level failures: an invalid
/// configuration, an unreadable roster or paper list, or an output directory
/// that cannot be written. Failures of individual papers are reported and
/// counted, never returned.
#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();
  setup_logging(cli.verbose);
  trace!("Starting texmine {}", env!("CARGO_PKG_VERSION"));

  let config = load_config(cli.config.as_deref())?;

  match cli.command {
    Commands::Download(args) => download(config, args).await,
    Commands::Enrich(args) => enrich(config, args).await,
    Commands::Inspect(args) => inspect(config, args).await,
  }
}
