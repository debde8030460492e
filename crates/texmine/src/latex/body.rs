//! Document body isolation.

use super::*;

lazy_static! {
  /// Every construct that ends the main matter. One combined pattern, so the
  /// earliest occurrence wins whichever alternative it is.
  static ref BACK_MATTER: Regex = Regex::new(
    r"(?i)\\appendix\b|\\begin\{appendix\}|\\section\*?\{(?:appendix|appendices)(?:\s|[}\[])|\\bibliography\{|\\bibliographystyle\{|\\end\{document\}"
  )
  .unwrap();
}

/// Returns the main matter of a flattened document.
///
/// The body starts right after `\begin{document}` and stops at the first
/// appendix, bibliography or `\end{document}`, whichever comes first. The
/// result is trimmed and may be empty.
///
/// Returns `None` if the document has no `\begin{document}` at all.
///
/// # Examples
///
/// ```
/// use texmine::latex::extract_body;
///
/// let source = r"\documentclass{article}
/// \begin{document}
/// Main text.
/// \appendix
/// Supplementary proofs.
/// \bibliography{refs}
/// \end{document}";
///
/// assert_eq!(extract_body(source).as_deref(), Some("Main text."));
/// assert_eq!(extract_body(r"\documentclass{article} no body"), None);
/// ```
pub fn extract_body(source: &str) -> Option<String> {
  let start = source.find(BEGIN_DOCUMENT_MARKER)? + BEGIN_DOCUMENT_MARKER.len();
  let body = &source[start..];
  let end = BACK_MATTER.find(body).map_or(body.len(), |m| m.start());
  Some(body[..end].trim().to_string())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn document(body: &str) -> String {
    format!("\\documentclass{{article}}\n\\begin{{document}}\n{body}")
  }

  #[test]
  fn test_earliest_boundary_wins() {
    let source = document("Text.\n\\appendix\nMore.\n\\bibliography{refs}\n\\end{document}");
    assert_eq!(extract_body(&source).unwrap(), "Text.");

    let source = document("Text.\n\\bibliographystyle{plain}\n\\appendix\n\\end{document}");
    assert_eq!(extract_body(&source).unwrap(), "Text.");
  }

  #[test]
  fn test_only_end_document() {
    let source = document("\\section{Intro}\nAll of it.\n\\end{document}\ntrailing");
    assert_eq!(extract_body(&source).unwrap(), "\\section{Intro}\nAll of it.");
  }

  #[test]
  fn test_appendix_variants() {
    for marker in [
      "\\begin{appendix}",
      "\\section{Appendix}",
      "\\section*{Appendices}",
      "\\section{Appendix A: Proofs}",
      "\\section[short]{x}\\section{APPENDIX}",
      "\\APPENDIX",
    ] {
      let source = document(&format!("Kept.\n{marker}\nDropped."));
      let body = extract_body(&source).unwrap();
      assert!(body.starts_with("Kept."), "marker {marker}");
      assert!(!body.contains("Dropped."), "marker {marker}");
    }
  }

  #[test]
  fn test_appendix_word_inside_section_title_is_not_a_boundary() {
    let source = document("\\section{Appendixes are fun}\nKept.\n\\end{document}");
    // "Appendixes" is followed by a letter, not a space or brace
    assert!(extract_body(&source).unwrap().contains("Kept."));

    let source = document("\\appendixname is a macro\nKept.");
    assert!(extract_body(&source).unwrap().contains("Kept."));
  }

  #[test]
  fn test_no_boundary_runs_to_end() {
    assert_eq!(extract_body(&document("  Unterminated body.  ")).unwrap(), "Unterminated body.");
  }

  #[test]
  fn test_empty_body_is_distinct_from_missing_marker() {
    assert_eq!(extract_body(&document("\n\n\\end{document}")), Some(String::new()));
    assert_eq!(extract_body("\\documentclass{article}\nno begin"), None);
  }
}
