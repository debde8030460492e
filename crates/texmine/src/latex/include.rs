//! Expansion of `\input` and `\include` directives.

use regex::Captures;

use super::*;

/// Deepest nesting level at which directives are still expanded.
///
/// Text nested deeper keeps its directives verbatim, which bounds the work
/// done on cyclic or self-including sources.
pub const MAX_INCLUDE_DEPTH: usize = 10;

lazy_static! {
  /// `\input{file}` or `\include{file}`
  static ref INCLUSION: Regex = Regex::new(r"\\(?:input|include)\{([^}]+)\}").unwrap();
}

/// Substitutes inclusion directives with the content of the files they name.
///
/// Only files inside the tree the expander was created for are read; a
/// directive naming anything else (for example `\input{/etc/passwd}` or
/// `\input{../../secret}`) is left in place like any other unresolved one.
///
/// # Examples
///
/// ```
/// use texmine::latex::InclusionExpander;
///
/// let dir = tempfile::tempdir().unwrap();
/// std::fs::write(dir.path().join("intro.tex"), "Hello from intro").unwrap();
///
/// let expander = InclusionExpander::new(dir.path());
/// let text = expander.expand(r"\input{intro} \input{missing}", dir.path());
/// assert_eq!(text, r"Hello from intro \input{missing}");
/// ```
#[derive(Debug, Clone)]
pub struct InclusionExpander {
  /// Canonical root of the source tree
  root: PathBuf,
}

impl InclusionExpander {
  /// Creates an expander confined to the tree below `root`.
  pub fn new(root: impl AsRef<Path>) -> Self {
    let root = root.as_ref();
    Self { root: root.canonicalize().unwrap_or_else(|_| root.to_path_buf()) }
  }

  /// Expands every directive in `text`, resolving names against `base_dir`.
  ///
  /// Included files have their comments stripped and are expanded relative to
  /// their own directory. Unresolvable directives stay verbatim.
  pub fn expand(&self, text: &str, base_dir: &Path) -> String { self.expand_at(text, base_dir, 0) }

  /// Expansion at a given nesting depth.
  fn expand_at(&self, text: &str, base_dir: &Path, depth: usize) -> String {
    if depth > MAX_INCLUDE_DEPTH {
      debug!("Inclusion depth limit reached in {}, leaving directives as-is", base_dir.display());
      return text.to_string();
    }

    INCLUSION
      .replace_all(text, |caps: &Captures| {
        let name = &caps[1];
        let Some(path) = self.resolve(base_dir, name) else {
          trace!("Unresolved inclusion: {name}");
          return caps[0].to_string();
        };
        match fs::read(&path) {
          Ok(bytes) => {
            trace!("Including {}", path.display());
            let content = strip_comments(&String::from_utf8_lossy(&bytes));
            let dir = path.parent().unwrap_or(base_dir);
            self.expand_at(&content, dir, depth + 1)
          },
          Err(e) => {
            debug!("Could not read included {}: {e}", path.display());
            caps[0].to_string()
          },
        }
      })
      .into_owned()
  }

  /// Finds `name` or `name.tex` below `base_dir`, inside the root.
  fn resolve(&self, base_dir: &Path, name: &str) -> Option<PathBuf> {
    [base_dir.join(name), base_dir.join(format!("{name}.{TEX_EXTENSION}"))]
      .into_iter()
      .find(|candidate| candidate.is_file() && self.contains(candidate))
  }

  /// Whether `path` resolves to a location inside the root.
  fn contains(&self, path: &Path) -> bool {
    path.canonicalize().is_ok_and(|resolved| resolved.starts_with(&self.root))
  }
}
