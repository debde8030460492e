//! Main file discovery.
//!
//! Multi-file submissions rarely say which file is the root document. The
//! [`MainFileLocator`] first looks for files with conventional names (see
//! [`CONVENTIONAL_NAMES`]) that actually declare a document class, and
//! otherwise falls back to the largest file that does.

use walkdir::WalkDir;

use super::*;

/// File names tried first, in priority order.
pub const CONVENTIONAL_NAMES: [&str; 5] =
  ["main.tex", "paper.tex", "ms.tex", "manuscript.tex", "article.tex"];

/// Picks the root document of an unpacked source tree.
#[derive(Debug, Default, Clone, Copy)]
pub struct MainFileLocator;

/// A `.tex` file found during the walk.
#[derive(Debug)]
struct Candidate {
  /// Location of the file
  path:       PathBuf,
  /// Size of the file in bytes
  len:        usize,
  /// Whether the content declares a document class
  has_marker: bool,
}

impl MainFileLocator {
  /// Creates a new locator.
  pub fn new() -> Self { Self }

  /// Returns the main document below `root`, if any.
  ///
  /// Only files containing `\documentclass` qualify. A conventionally named
  /// file wins over any other; among the rest the largest wins, with ties
  /// going to the first file in walk order.
  ///
  /// # Examples
  ///
  /// ```
  /// use texmine::locate::MainFileLocator;
  ///
  /// let dir = tempfile::tempdir().unwrap();
  /// std::fs::write(dir.path().join("paper.tex"), "\\documentclass{article}").unwrap();
  /// std::fs::write(dir.path().join("macros.tex"), "\\newcommand{\\R}{\\mathbb{R}}").unwrap();
  ///
  /// let main = MainFileLocator::new().find(dir.path()).unwrap();
  /// assert!(main.ends_with("paper.tex"));
  /// ```
  pub fn find(&self, root: &Path) -> Option<PathBuf> {
    let candidates = collect_candidates(root);
    trace!("Found {} .tex candidates below {}", candidates.len(), root.display());

    for name in CONVENTIONAL_NAMES {
      let conventional = candidates
        .iter()
        .find(|c| c.has_marker && c.path.file_name().is_some_and(|f| f == name));
      if let Some(candidate) = conventional {
        debug!("Main file by name: {}", candidate.path.display());
        return Some(candidate.path.clone());
      }
    }

    let mut largest: Option<&Candidate> = None;
    for candidate in candidates.iter().filter(|c| c.has_marker) {
      if largest.map_or(true, |best| candidate.len > best.len) {
        largest = Some(candidate);
      }
    }
    if let Some(candidate) = largest {
      debug!("Main file by size: {} ({} bytes)", candidate.path.display(), candidate.len);
    }
    largest.map(|c| c.path.clone())
  }
}

/// Walks `root` in file-name order and reads every `.tex` file once.
fn collect_candidates(root: &Path) -> Vec<Candidate> {
  WalkDir::new(root)
    .sort_by_file_name()
    .into_iter()
    .filter_map(|entry| entry.ok())
    .filter(|entry| entry.file_type().is_file())
    .filter(|entry| entry.path().extension().is_some_and(|ext| ext == TEX_EXTENSION))
    .map(walkdir::DirEntry::into_path)
    .filter_map(|path| match fs::read(&path) {
      Ok(bytes) => Some(Candidate {
        has_marker: String::from_utf8_lossy(&bytes).contains(DOCUMENT_CLASS_MARKER),
        len: bytes.len(),
        path,
      }),
      Err(e) => {
        debug!("Skipping unreadable {}: {e}", path.display());
        None
      },
    })
    .collect()
}
