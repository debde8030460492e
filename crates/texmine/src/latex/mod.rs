//! Lexical mining of LaTeX sources.
//!
//! Nothing in here parses LaTeX. Each extractor looks for one structural cue
//! (a `\title{...}`, an `abstract` environment, a `\section{Introduction}`)
//! with a compiled-once pattern owned by its submodule, and the raw spans are
//! then flattened to plain text by [`clean_latex`].
//!
//! The usual order of operations is:
//!
//! 1. [`strip_comments`] on the main file
//! 2. [`InclusionExpander::expand`] to pull in `\input`/`\include`d files
//! 3. [`Metadata::from_source`] and/or [`extract_body`] on the flattened text
//!
//! [`flatten`] performs the first two steps, [`parse`] all three for metadata.
//!
//! # Examples
//!
//! ```
//! use texmine::latex::Metadata;
//!
//! let source = r"\title{On \emph{Sparse} Attention}
//! \author{Alice Smith \and Bob Jones}
//! \begin{document}
//! \section{Introduction}
//! Attention is quadratic.
//! \section{Method}
//! \end{document}";
//!
//! let metadata = Metadata::from_source(source);
//! assert_eq!(metadata.title, "On Sparse Attention");
//! assert_eq!(metadata.authors, vec!["Alice Smith", "Bob Jones"]);
//! assert_eq!(metadata.introduction, "Attention is quadratic.");
//! ```

use super::*;

pub mod body;
pub mod braces;
pub mod clean;
pub mod comments;
pub mod fields;
pub mod include;

pub use self::{
  body::extract_body,
  braces::extract_braced,
  clean::clean_latex,
  comments::strip_comments,
  fields::{
    extract_abstract, extract_authors, extract_introduction, extract_keywords, extract_title,
    Metadata, INTRODUCTION_MAX_CHARS,
  },
  include::{InclusionExpander, MAX_INCLUDE_DEPTH},
};

/// Strips comments from a main file and expands its inclusion directives.
///
/// `base_dir` is the directory containing the main file; inclusions are
/// resolved relative to it.
pub fn flatten(content: &str, expander: &InclusionExpander, base_dir: &Path) -> String {
  expander.expand(&strip_comments(content), base_dir)
}

/// Flattens a main file and runs every field extractor over the result.
pub fn parse(content: &str, expander: &InclusionExpander, base_dir: &Path) -> Metadata {
  Metadata::from_source(&flatten(content, expander, base_dir))
}
