//! Fixtures shared by the unit tests.

use std::io::Write;

use flate2::{write::GzEncoder, Compression};
use tar::{Builder, EntryType, Header};

/// A small but complete paper.
pub const BASIC_DOC: &str = r"\documentclass{article}
\usepackage{amsmath}
% \input{never-included}
\title{Sparse Attention for Long Documents}
\author{Alice Smith \and Bob Jones}
\begin{document}
\maketitle
\begin{abstract}
We study \emph{sparse} attention over long inputs.
\end{abstract}
\keywords{attention, transformers; long context}
\section{Introduction}
Long documents are hard \cite{vaswani2017}. We show that $O(n)$ attention suffices.
\section{Method}
Our method is simple.
\appendix
\section{Proofs}
Appendix material.
\bibliography{refs}
\end{document}
";

/// One tar member whose name is written verbatim into the header.
pub struct Member {
  /// Header with name, size and type already set
  header: Header,
  /// Member content
  data:   Vec<u8>,
}

impl Member {
  /// Points a link member at `target`.
  pub fn link_to(mut self, target: &str) -> Self {
    self.header.set_link_name(target).unwrap();
    self.header.set_cksum();
    self
  }
}

/// Builds a member without the path validation `tar::Builder` applies, so
/// hostile names like `../x` can be produced.
pub fn raw_member(name: &str, data: &[u8], kind: EntryType) -> Member {
  let mut header = Header::new_gnu();
  let bytes = name.as_bytes();
  header.as_old_mut().name[..bytes.len()].copy_from_slice(bytes);
  header.set_entry_type(kind);
  header.set_size(data.len() as u64);
  header.set_mode(0o644);
  header.set_cksum();
  Member { header, data: data.to_vec() }
}

/// Packs members into a gzip-compressed tar archive.
pub fn tar_gz_members(members: Vec<Member>) -> Vec<u8> {
  let mut builder = Builder::new(GzEncoder::new(Vec::new(), Compression::default()));
  for member in members {
    builder.append(&member.header, member.data.as_slice()).unwrap();
  }
  builder.into_inner().unwrap().finish().unwrap()
}

/// Packs `(name, content)` pairs into a gzip-compressed tar archive.
pub fn tar_gz(files: &[(&str, &str)]) -> Vec<u8> {
  tar_gz_members(
    files
      .iter()
      .map(|(name, content)| raw_member(name, content.as_bytes(), EntryType::Regular))
      .collect(),
  )
}

/// Compresses `data` as a single gzip stream.
pub fn gzip(data: &[u8]) -> Vec<u8> {
  let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
  encoder.write_all(data).unwrap();
  encoder.finish().unwrap()
}
