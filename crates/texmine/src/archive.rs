//! Unpacking of untrusted source bundles.
//!
//! arXiv serves a paper's source in one of three shapes, which are tried in
//! order:
//!
//! 1. A gzip-compressed tar archive
//! 2. A single gzip-compressed file (written as [`SINGLE_FILE_NAME`])
//! 3. Plain LaTeX text (also written as [`SINGLE_FILE_NAME`])
//!
//! Archive members with absolute names or `..` components are dropped, as are
//! links and special files, so nothing is ever written outside the target
//! directory.
//!
//! # Examples
//!
//! ```no_run
//! use texmine::archive::ArchiveExtractor;
//!
//! # fn example(bundle: &[u8]) -> std::io::Result<()> {
//! let dir = tempfile::tempdir()?;
//! if ArchiveExtractor::new().extract(bundle, dir.path()) {
//!   println!("Unpacked into {}", dir.path().display());
//! }
//! # Ok(())
//! # }
//! ```

use std::{
  io::{self, Read},
  path::Component,
};

use flate2::read::{GzDecoder, MultiGzDecoder};
use tar::{Archive, EntryType};

use super::*;

/// File name used when a bundle holds a single document rather than an archive.
pub const SINGLE_FILE_NAME: &str = "main.tex";

/// The two magic bytes opening every gzip stream.
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Container format a bundle was recognized as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
  /// gzip-compressed tar archive
  TarGz,
  /// Single gzip-compressed file
  Gzip,
  /// Uncompressed UTF-8 LaTeX
  PlainText,
}

/// Unpacks source bundles into a directory.
#[derive(Debug, Default, Clone, Copy)]
pub struct ArchiveExtractor;

/// Result of trying to read the bundle as a tar archive.
#[derive(Debug)]
enum TarAttempt {
  /// At least one regular file was written
  Extracted(usize),
  /// The bundle is a tar archive, but every member was rejected
  NothingUsable,
  /// The bundle is not a (readable) tar archive
  NotTar(String),
}

/// Per-archive counters.
#[derive(Debug, Default)]
struct TarTally {
  /// Members read from the archive
  seen:      usize,
  /// Regular files written
  extracted: usize,
}

impl ArchiveExtractor {
  /// Creates a new extractor.
  pub fn new() -> Self { Self }

  /// Unpacks `data` into `target`, returning whether any usable file was written.
  pub fn extract(&self, data: &[u8], target: &Path) -> bool {
    self.extract_kind(data, target).is_some()
  }

  /// Unpacks `data` into `target`, returning the recognized container format.
  ///
  /// Returns `None` if the bytes match none of the supported formats. In that
  /// case `target` holds no files written by this call.
  pub fn extract_kind(&self, data: &[u8], target: &Path) -> Option<ArchiveKind> {
    if data.starts_with(&GZIP_MAGIC) {
      match self.try_tar_gz(data, target) {
        TarAttempt::Extracted(count) => {
          debug!("Extracted {count} files from tar.gz bundle");
          return Some(ArchiveKind::TarGz);
        },
        TarAttempt::NothingUsable => {
          warn!("tar.gz bundle contained no safe regular files");
          return None;
        },
        TarAttempt::NotTar(reason) => debug!("Not a tar.gz bundle: {reason}"),
      }

      if self.try_gzip(data, target) {
        debug!("Extracted single gzip-compressed file");
        return Some(ArchiveKind::Gzip);
      }
    }

    if self.try_plain_text(data, target) {
      debug!("Bundle is plain LaTeX text");
      return Some(ArchiveKind::PlainText);
    }

    None
  }

  /// Attempts tar+gzip extraction, removing partial output on failure.
  fn try_tar_gz(&self, data: &[u8], target: &Path) -> TarAttempt {
    let mut archive = Archive::new(GzDecoder::new(data));
    match unpack_safe_members(&mut archive, target) {
      Ok(tally) if tally.seen == 0 => TarAttempt::NotTar("archive has no members".into()),
      Ok(tally) if tally.extracted == 0 => TarAttempt::NothingUsable,
      Ok(tally) => TarAttempt::Extracted(tally.extracted),
      Err(e) => {
        clear_directory(target);
        TarAttempt::NotTar(e.to_string())
      },
    }
  }

  /// Attempts single-stream gzip decompression.
  fn try_gzip(&self, data: &[u8], target: &Path) -> bool {
    let mut decompressed = Vec::new();
    if let Err(e) = MultiGzDecoder::new(data).read_to_end(&mut decompressed) {
      debug!("Not a gzip stream: {e}");
      return false;
    }
    write_single_file(target, &decompressed)
  }

  /// Accepts UTF-8 text that looks like a LaTeX document.
  fn try_plain_text(&self, data: &[u8], target: &Path) -> bool {
    let Ok(text) = std::str::from_utf8(data) else {
      return false;
    };
    if !text.contains(DOCUMENT_CLASS_MARKER) && !text.contains(BEGIN_DOCUMENT_MARKER) {
      return false;
    }
    write_single_file(target, data)
  }
}

/// Whether an archive member name stays inside the extraction directory.
fn is_safe_member(path: &Path) -> bool {
  path.components().all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

/// Writes every safe directory and regular file of `archive` below `target`.
fn unpack_safe_members<R: Read>(archive: &mut Archive<R>, target: &Path) -> io::Result<TarTally> {
  let mut tally = TarTally::default();

  for entry in archive.entries()? {
    let mut entry = entry?;
    tally.seen += 1;

    let path = entry.path()?.into_owned();
    if !is_safe_member(&path) {
      warn!("Rejecting unsafe archive member: {}", path.display());
      continue;
    }

    let destination = target.join(&path);
    match entry.header().entry_type() {
      EntryType::Directory => fs::create_dir_all(&destination)?,
      EntryType::Regular | EntryType::Continuous => {
        if let Some(parent) = destination.parent() {
          fs::create_dir_all(parent)?;
        }
        let mut file = fs::File::create(&destination)?;
        io::copy(&mut entry, &mut file)?;
        tally.extracted += 1;
      },
      other => warn!("Rejecting {other:?} archive member: {}", path.display()),
    }
  }

  Ok(tally)
}

/// Writes a single-document bundle under the fixed file name.
fn write_single_file(target: &Path, content: &[u8]) -> bool {
  match fs::write(target.join(SINGLE_FILE_NAME), content) {
    Ok(()) => true,
    Err(e) => {
      warn!("Could not write {SINGLE_FILE_NAME}: {e}");
      false
    },
  }
}

/// Removes everything below `dir`, keeping `dir` itself.
fn clear_directory(dir: &Path) {
  let Ok(entries) = fs::read_dir(dir) else {
    return;
  };
  for entry in entries.flatten() {
    let path = entry.path();
    let removed =
      if path.is_dir() { fs::remove_dir_all(&path) } else { fs::remove_file(&path) };
    if let Err(e) = removed {
      warn!("Could not remove partial extraction {}: {e}", path.display());
    }
  }
}
