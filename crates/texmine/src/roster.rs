//! The list of papers to process.
//!
//! A roster is produced by an upstream scoring step. Two shapes are accepted:
//! a bare JSON array of paper descriptors, or an object carrying that array
//! under `scored_papers_summary`.
//!
//! ```json
//! {
//!   "scored_papers_summary": [
//!     { "arxiv_id": "2301.07041", "title": "Some Paper", "score": 8.5 }
//!   ]
//! }
//! ```

use super::*;

/// One paper to process. Only the identifier is required.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaperDescriptor {
  /// arXiv identifier, e.g. `2301.07041`
  #[serde(rename = "arxiv_id", alias = "identifier")]
  pub identifier:      String,
  /// Human-readable title, used for logging and the run summary
  #[serde(default)]
  pub title:           String,
  /// Relevance score assigned upstream
  #[serde(default, rename = "score", alias = "relevance_score")]
  pub relevance_score: f64,
}

impl PaperDescriptor {
  /// Creates a descriptor with no title and a zero score.
  pub fn new(identifier: impl Into<String>) -> Self {
    Self { identifier: identifier.into(), title: String::new(), relevance_score: 0.0 }
  }
}

/// The accepted top-level shapes.
#[derive(Deserialize)]
#[serde(untagged)]
enum RosterDocument {
  /// `{ "scored_papers_summary": [...] }`
  Summary {
    /// The wrapped descriptors
    scored_papers_summary: Vec<PaperDescriptor>,
  },
  /// `[...]`
  List(Vec<PaperDescriptor>),
}

/// Reads a roster file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not one of the accepted
/// shapes, or contains a descriptor with a blank identifier.
pub fn load_roster(path: impl AsRef<Path>) -> Result<Vec<PaperDescriptor>> {
  let path = path.as_ref();
  let content = fs::read_to_string(path)?;
  let papers = parse_roster(&content)?;
  debug!("Loaded {} papers from {}", papers.len(), path.display());
  Ok(papers)
}

/// Parses roster JSON.
pub fn parse_roster(content: &str) -> Result<Vec<PaperDescriptor>> {
  let papers = match serde_json::from_str(content)? {
    RosterDocument::Summary { scored_papers_summary } => scored_papers_summary,
    RosterDocument::List(papers) => papers,
  };
  if let Some(position) = papers.iter().position(|p| p.identifier.trim().is_empty()) {
    return Err(TexmineError::Roster(format!("paper #{} has an empty arxiv_id", position + 1)));
  }
  Ok(papers)
}
