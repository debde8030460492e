//! Line comment removal.

/// Removes every `%` comment, keeping escaped `\%` and the line breaks.
///
/// # Examples
///
/// ```
/// use texmine::latex::strip_comments;
///
/// let text = "Growth of 50\\% % measured in 2024\nnext line";
/// assert_eq!(strip_comments(text), "Growth of 50\\% \nnext line");
/// ```
pub fn strip_comments(text: &str) -> String {
  let mut stripped = String::with_capacity(text.len());
  for line in text.split_inclusive('\n') {
    match comment_start(line) {
      Some(start) => {
        stripped.push_str(&line[..start]);
        if line.ends_with('\n') {
          stripped.push('\n');
        }
      },
      None => stripped.push_str(line),
    }
  }
  stripped
}

/// Byte offset of the first unescaped `%` in `line`.
fn comment_start(line: &str) -> Option<usize> {
  let bytes = line.as_bytes();
  (0..bytes.len()).find(|&i| bytes[i] == b'%' && (i == 0 || bytes[i - 1] != b'\\'))
}
