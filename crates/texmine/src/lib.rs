//! Mining arXiv LaTeX source bundles for metadata and body text.
//!
//! `texmine` turns the source bundles published on arXiv into material a
//! summarizer can read:
//!
//! - Safe unpacking of untrusted bundles (tar+gzip, bare gzip, plain text)
//! - Discovery of the main `.tex` file among many candidates
//! - Flattening of `\input`/`\include` trees with a bounded recursion depth
//! - Lexical extraction of title, authors, keywords, abstract and introduction
//! - Isolation of the document body up to the first back-matter boundary
//! - Conversion of the body to structured text through an optional external
//!   converter, with a plain-text fallback
//!
//! LaTeX is treated as a lexical source to mine for structural cues, never as
//! a language to execute.
//!
//! # Getting Started
//!
//! ```no_run
//! use texmine::{
//!   config::Config,
//!   fetch::ArxivSource,
//!   format::{BodyFormatter, Converter},
//!   processor::{PaperProcessor, RunContext},
//!   roster::load_roster,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!   let config = Config::load(Config::default_path())?;
//!   let papers = load_roster("scored_papers_summary.json")?;
//!
//!   let fetcher = ArxivSource::new(&config)?;
//!   let formatter = BodyFormatter::new(Converter::probe(&config.converter));
//!   let mut processor = PaperProcessor::new(&config, fetcher, formatter)?;
//!
//!   let context = processor.run(&papers, RunContext::new()).await;
//!   context.save(config.summary_path())?;
//!   Ok(())
//! }
//! ```
//!
//! # Module Organization
//!
//! - [`archive`]: Source bundle unpacking with path-traversal filtering
//! - [`locate`]: Main file discovery
//! - [`latex`]: Comment stripping, inclusion expansion and field extraction
//! - [`format`]: Body-to-text conversion
//! - [`fetch`]: Source bundle retrieval
//! - [`processor`]: The per-paper pipeline and run statistics
//! - [`enrich`]: Attaching extracted metadata to paper lists
//! - [`roster`]: Loading the list of papers to process
//! - [`config`]: Run configuration
//! - [`prelude`]: Common traits and types for ergonomic imports

#![warn(missing_docs, clippy::missing_docs_in_private_items)]

use std::{
  fs,
  path::{Path, PathBuf},
  time::Duration,
};

use async_trait::async_trait;
use chrono::{DateTime, Local};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};
#[cfg(test)]
use {tempfile::tempdir, tracing_test::traced_test};

pub mod archive;
pub mod config;
pub mod enrich;
pub mod error;
pub mod fetch;
pub mod format;
pub mod latex;
pub mod locate;
pub mod processor;
pub mod roster;

#[cfg(test)]
mod testing;

use crate::{config::*, error::*};

/// File extension of LaTeX sources.
pub const TEX_EXTENSION: &str = "tex";

/// Marker every main document must contain.
pub const DOCUMENT_CLASS_MARKER: &str = r"\documentclass";

/// Marker that opens the document body.
pub const BEGIN_DOCUMENT_MARKER: &str = r"\begin{document}";

/// Common traits and types for ergonomic imports.
///
/// # Usage
///
/// ```no_run
/// use texmine::prelude::*;
///
/// fn describe(err: &TexmineError) -> String { err.to_string() }
/// ```
pub mod prelude {
  pub use crate::{
    error::TexmineError,
    fetch::SourceFetcher,
    processor::{Outcome, PaperRecord, RunContext},
  };
}
