//! Metadata field extraction.
//!
//! Every extractor takes comment-stripped, flattened source and returns
//! normalized text. A field that cannot be found comes back empty; fields
//! are independent of one another.

use super::*;

/// Upper bound on the length of [`Metadata::introduction`], in characters.
pub const INTRODUCTION_MAX_CHARS: usize = 2000;

lazy_static! {
  static ref TITLE: Regex = Regex::new(r"\\title\s*(?:\[[^\]]*\])?\s*\{").unwrap();
  static ref AUTHOR: Regex = Regex::new(r"\\author\s*(?:\[[^\]]*\])?\s*\{").unwrap();
  /// Affiliation, footnote and contact commands inside `\author`
  static ref AUTHOR_NOTE: Regex =
    Regex::new(r"\\(?:affiliation|thanks|email|inst|orcid|fnmark)\{[^}]*\}").unwrap();
  /// Footnote markers that carry at most an optional argument
  static ref AUTHOR_MARK: Regex =
    Regex::new(r"\\(?:affiliationmark|thanksmark)\s*(?:\[[^\]]*\])?").unwrap();
  /// `\and`, `\\` or a bare "and" between author names
  static ref AUTHOR_SEPARATOR: Regex = Regex::new(r"\\and\b|\\\\|\band\b").unwrap();
  static ref KEYWORDS_COMMAND: Regex = Regex::new(r"\\keywords\s*\{").unwrap();
  static ref KEYWORDS_ENVIRONMENT: Regex =
    Regex::new(r"(?s)\\begin\{keywords\}(.*?)\\end\{keywords\}").unwrap();
  static ref IEEE_KEYWORDS_ENVIRONMENT: Regex =
    Regex::new(r"(?s)\\begin\{IEEEkeywords\}(.*?)\\end\{IEEEkeywords\}").unwrap();
  /// Comma, semicolon or elsarticle's `\sep`
  static ref KEYWORD_SEPARATOR: Regex = Regex::new(r"[,;]|\\sep\b").unwrap();
  static ref ABSTRACT_ENVIRONMENT: Regex =
    Regex::new(r"(?s)\\begin\{abstract\}(.*?)\\end\{abstract\}").unwrap();
  /// `\section{Introduction}`, `\section*{1. INTRODUCTION}`, ...
  static ref INTRODUCTION_HEADING: Regex =
    Regex::new(r"\\section\*?\{(?:\d+\.?\s*)?(?i:introduction)\}").unwrap();
  /// Whatever ends the introduction
  static ref INTRODUCTION_END: Regex =
    Regex::new(r"\\(?:section|bibliography|appendix|end\{document\})").unwrap();
}

/// Metadata mined from a paper's source.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Metadata {
  /// Title of the paper
  pub title:         String,
  /// Author names in source order
  pub authors:       Vec<String>,
  /// Author-supplied keywords in source order
  pub keywords:      Vec<String>,
  /// Abstract text
  #[serde(rename = "abstract")]
  pub abstract_text: String,
  /// Introduction text, at most [`INTRODUCTION_MAX_CHARS`] characters
  pub introduction:  String,
}

impl Metadata {
  /// Runs every field extractor over flattened source.
  pub fn from_source(source: &str) -> Self {
    Self {
      title:         extract_title(source),
      authors:       extract_authors(source),
      keywords:      extract_keywords(source),
      abstract_text: extract_abstract(source),
      introduction:  extract_introduction(source),
    }
  }

  /// Whether the fields a downstream summarizer cannot get elsewhere were found.
  ///
  /// Title, authors and abstract are usually available from the listing API
  /// already, so only keywords and the introduction count.
  pub fn has_content(&self) -> bool { !self.keywords.is_empty() || !self.introduction.is_empty() }
}

/// Braced argument of the first command matched by `pattern`.
fn command_argument<'a>(pattern: &Regex, source: &'a str) -> Option<&'a str> {
  // every pattern ends on the opening brace
  pattern.find(source).map(|m| extract_braced(source, m.end() - 1))
}

/// Splits `text` on `separator`, normalizing each piece.
fn split_clean(separator: &Regex, text: &str) -> Vec<String> {
  separator.split(text).map(clean_latex).collect()
}

/// Extracts the `\title`, ignoring any `[short title]`.
pub fn extract_title(source: &str) -> String {
  command_argument(&TITLE, source).map(clean_latex).unwrap_or_default()
}

/// Extracts the author names from `\author`.
///
/// # Examples
///
/// ```
/// use texmine::latex::extract_authors;
///
/// let source = r"\author{Ada Lovelace\thanks{Analytical Engine} \and
///   Charles Babbage, Mary Somerville \\ (Royal Society)}";
/// assert_eq!(
///   extract_authors(source),
///   vec!["Ada Lovelace", "Charles Babbage", "Mary Somerville"]
/// );
/// ```
pub fn extract_authors(source: &str) -> Vec<String> {
  let Some(raw) = command_argument(&AUTHOR, source) else {
    return Vec::new();
  };
  let raw = AUTHOR_NOTE.replace_all(raw, "");
  let raw = AUTHOR_MARK.replace_all(&raw, "");

  AUTHOR_SEPARATOR
    .split(&raw)
    .flat_map(|segment| segment.split(','))
    .map(clean_latex)
    .filter(|name| name.chars().count() > 1 && !name.starts_with('('))
    .collect()
}

/// Extracts keywords from `\keywords{}`, a `keywords` or an `IEEEkeywords`
/// environment, whichever is found first.
pub fn extract_keywords(source: &str) -> Vec<String> {
  let raw = command_argument(&KEYWORDS_COMMAND, source)
    .filter(|raw| !raw.trim().is_empty())
    .or_else(|| environment_body(&KEYWORDS_ENVIRONMENT, source))
    .or_else(|| environment_body(&IEEE_KEYWORDS_ENVIRONMENT, source));

  match raw {
    Some(raw) =>
      split_clean(&KEYWORD_SEPARATOR, raw).into_iter().filter(|keyword| !keyword.is_empty()).collect(),
    None => Vec::new(),
  }
}

/// Extracts the `abstract` environment.
pub fn extract_abstract(source: &str) -> String {
  environment_body(&ABSTRACT_ENVIRONMENT, source).map(clean_latex).unwrap_or_default()
}

/// Extracts the Introduction section, truncated to [`INTRODUCTION_MAX_CHARS`].
///
/// The section ends at the next `\section`, the bibliography, the appendix
/// or the end of the document.
pub fn extract_introduction(source: &str) -> String {
  let Some(heading) = INTRODUCTION_HEADING.find(source) else {
    return String::new();
  };
  let rest = &source[heading.end()..];
  let end = INTRODUCTION_END.find(rest).map_or(rest.len(), |m| m.start());

  let text = clean_latex(&rest[..end]);
  match text.char_indices().nth(INTRODUCTION_MAX_CHARS) {
    Some((cut, _)) => text[..cut].to_string(),
    None => text,
  }
}

/// First capture of an environment pattern, if it has non-blank content.
fn environment_body<'a>(pattern: &Regex, source: &'a str) -> Option<&'a str> {
  pattern
    .captures(source)
    .and_then(|caps| caps.get(1))
    .map(|body| body.as_str())
    .filter(|body| !body.trim().is_empty())
}
