//! Error types for the texmine command line interface.

use thiserror::Error;

use super::*;

/// Error type alias used for the texmine CLI.
pub type Result<T> = core::result::Result<T, TexminedError>;

/// Errors that end a command.
#[derive(Error, Debug)]
pub enum TexminedError {
  /// An error from the `texmine` library.
  #[error(transparent)]
  Texmine(#[from] TexmineError),

  /// A file system operation failed outside the library.
  #[error(transparent)]
  Io(#[from] std::io::Error),

  /// JSON output could not be produced.
  #[error(transparent)]
  Json(#[from] serde_json::Error),

  /// The input to `inspect` holds no usable LaTeX document.
  #[error("{0}")]
  Inspect(String),
}
