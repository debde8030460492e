//! Error types for the texmine library.
//!
//! Errors in this crate fall into two groups:
//! - Run-level failures (bad configuration, unreadable roster) that end a run
//! - Per-paper failures (network, extraction, I/O) that the
//!   [`PaperProcessor`](crate::processor::PaperProcessor) converts into an
//!   [`Outcome`](crate::processor::Outcome) instead of propagating
//!
//! # Examples
//!
//! ```no_run
//! use texmine::{error::TexmineError, roster::load_roster};
//!
//! match load_roster("scored_papers_summary.json") {
//!   Ok(papers) => println!("{} papers to process", papers.len()),
//!   Err(TexmineError::Io(e)) => println!("Could not read roster: {}", e),
//!   Err(e) => println!("Other error: {}", e),
//! }
//! ```

use thiserror::Error;

/// Error type alias used for the [`texmine`](crate) crate.
pub type Result<T> = core::result::Result<T, TexmineError>;

/// Errors that can occur when mining paper sources.
#[derive(Error, Debug)]
pub enum TexmineError {
  /// A network request failed.
  ///
  /// This can occur when:
  /// - The network is unavailable
  /// - The server is unreachable
  /// - The request times out
  /// - TLS errors occur
  #[error(transparent)]
  Network(#[from] reqwest::Error),

  /// The source server answered with an error status other than "not found".
  ///
  /// The string carries the status line for debugging.
  #[error("API error: {0}")]
  ApiError(String),

  /// A file system operation failed.
  ///
  /// This occurs when:
  /// - Creating the output directory fails
  /// - Reading a roster or writing an artifact fails
  /// - Permission errors occur
  #[error(transparent)]
  Io(#[from] std::io::Error),

  /// A JSON document (roster, paper list, run summary) could not be
  /// serialized or deserialized.
  #[error(transparent)]
  Json(#[from] serde_json::Error),

  /// The TOML configuration file is malformed.
  #[error(transparent)]
  TomlDe(#[from] toml::de::Error),

  /// The configuration is invalid, e.g. a URL template without an
  /// `{identifier}` placeholder.
  #[error("{0}")]
  Config(String),

  /// The input roster parsed but does not describe any usable papers.
  #[error("Invalid roster: {0}")]
  Roster(String),
}
