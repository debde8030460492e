//! Balanced brace matching.

/// Returns the text strictly between the brace at `open` and its match.
///
/// Braces preceded by a backslash are literal and never change the nesting
/// depth. The result is empty if `open` does not point at an unescaped `{`
/// or the brace is never closed. An escaped `\{` at `open` is a literal
/// character, not a group, so it yields an empty result as well.
///
/// # Examples
///
/// ```
/// use texmine::latex::extract_braced;
///
/// let text = r"\title{Groups {and} Rings \{sic\}} trailing";
/// let open = text.find('{').unwrap();
/// assert_eq!(extract_braced(text, open), r"Groups {and} Rings \{sic\}");
/// assert_eq!(extract_braced("{never closed", 0), "");
/// ```
pub fn extract_braced(text: &str, open: usize) -> &str {
  let bytes = text.as_bytes();
  if bytes.get(open) != Some(&b'{') || is_escaped(bytes, open) {
    return "";
  }

  let mut depth = 1usize;
  for i in open + 1..bytes.len() {
    match bytes[i] {
      b'{' if !is_escaped(bytes, i) => depth += 1,
      b'}' if !is_escaped(bytes, i) => {
        depth -= 1;
        if depth == 0 {
          return &text[open + 1..i];
        }
      },
      _ => {},
    }
  }
  ""
}

/// Whether the byte at `index` is preceded by a backslash.
fn is_escaped(bytes: &[u8], index: usize) -> bool { index > 0 && bytes[index - 1] == b'\\' }

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_nested() {
    assert_eq!(extract_braced("{a{b{c}}d}e", 0), "a{b{c}}d");
    assert_eq!(extract_braced("x{inner}", 1), "inner");
    assert_eq!(extract_braced("{}", 0), "");
  }

  #[test]
  fn test_escaped_braces_do_not_count() {
    assert_eq!(extract_braced(r"{a\}b}c", 0), r"a\}b");
    assert_eq!(extract_braced(r"{a\{b}c", 0), r"a\{b");
  }

  #[test]
  fn test_unmatched() {
    assert_eq!(extract_braced("{a{b}", 0), "");
    assert_eq!(extract_braced(r"{a\}", 0), "");
  }

  #[test]
  fn test_index_not_on_open_brace() {
    assert_eq!(extract_braced("abc{d}", 0), "");
    assert_eq!(extract_braced("abc", 10), "");
    assert_eq!(extract_braced(r"\{d}", 1), "");
  }

  #[test]
  fn test_multibyte_content() {
    assert_eq!(extract_braced("{Gödel's théorème}", 0), "Gödel's théorème");
  }
}
