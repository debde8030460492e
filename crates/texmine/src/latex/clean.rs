//! Lossy LaTeX-to-text normalization.

use super::*;

lazy_static! {
  /// Citation and cross-reference commands, dropped with their argument
  static ref REFERENCE: Regex =
    Regex::new(r"\\(?:cite|citep|citet|ref|label|eqref|cref|Cref)\{[^}]*\}").unwrap();
  /// Font and text-mode wrappers, replaced by their argument
  static ref FORMATTING: Regex =
    Regex::new(r"\\(?:emph|textbf|textit|text|textrm|textsc)\{([^}]*)\}").unwrap();
  /// `\[ ... \]` display math
  static ref BRACKET_MATH: Regex = Regex::new(r"(?s)\\\[.*?\\\]").unwrap();
  /// `\( ... \)` inline math
  static ref PAREN_MATH: Regex = Regex::new(r"(?s)\\\(.*?\\\)").unwrap();
  /// `$$ ... $$` display math
  static ref DOLLAR_DISPLAY_MATH: Regex = Regex::new(r"(?s)\$\$.*?\$\$").unwrap();
  /// Any remaining command with its optional and braced arguments
  static ref COMMAND: Regex =
    Regex::new(r"\\[a-zA-Z]+\*?(?:\[[^\]]*\])?(?:\{[^}]*\})*").unwrap();
  /// Stray group delimiters
  static ref BRACE: Regex = Regex::new(r"[{}]").unwrap();
  static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// Reduces LaTeX markup to a single line of plain text.
///
/// The steps run in a fixed order: references are dropped, formatting
/// wrappers are unwrapped, all math is removed, remaining commands are
/// removed together with their arguments, braces are stripped and
/// whitespace is collapsed. Math and citations are discarded, not
/// transliterated.
///
/// # Examples
///
/// ```
/// use texmine::latex::clean_latex;
///
/// let text = r"We prove \textbf{Theorem} \ref{thm:main} for $x > 0$ \cite{knuth}.";
/// assert_eq!(clean_latex(text), "We prove Theorem for .");
/// ```
pub fn clean_latex(text: &str) -> String {
  let text = REFERENCE.replace_all(text, "");
  let text = FORMATTING.replace_all(&text, "$1");
  let text = BRACKET_MATH.replace_all(&text, "");
  let text = PAREN_MATH.replace_all(&text, "");
  let text = strip_inline_math(&text);
  let text = DOLLAR_DISPLAY_MATH.replace_all(&text, "");
  let text = COMMAND.replace_all(&text, "");
  let text = BRACE.replace_all(&text, "");
  WHITESPACE.replace_all(&text, " ").trim().to_string()
}

/// Removes `$...$` spans.
///
/// A delimiter is a `$` not adjacent to another `$`; a span runs from one
/// delimiter to the next on the same line. `$$` pairs are left for the
/// display-math pass.
fn strip_inline_math(text: &str) -> String {
  let bytes = text.as_bytes();
  let delimiters: Vec<usize> = (0..bytes.len())
    .filter(|&i| {
      bytes[i] == b'$' && (i == 0 || bytes[i - 1] != b'$') && bytes.get(i + 1) != Some(&b'$')
    })
    .collect();

  let mut stripped = String::with_capacity(text.len());
  let mut copied_to = 0;
  let mut k = 0;
  while k + 1 < delimiters.len() {
    let (open, close) = (delimiters[k], delimiters[k + 1]);
    if bytes[open + 1..close].contains(&b'\n') {
      k += 1;
      continue;
    }
    stripped.push_str(&text[copied_to..open]);
    copied_to = close + 1;
    k += 2;
  }
  stripped.push_str(&text[copied_to..]);
  stripped
}
