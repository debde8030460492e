//! The per-paper pipeline.
//!
//! For every paper, [`PaperProcessor::process`] walks through
//!
//! ```text
//! artifact exists? ─yes─▶ skipped
//!       │ no
//! fetch bundle ──────────▶ no_source       (404 or fetch failure)
//! unpack to temp dir ────▶ extract_failed
//! locate main file ──────▶ no_main_tex
//! strip + expand + body ─▶ no_main_tex     (no \begin{document})
//!                       └▶ empty_body      (blank body)
//! format ────────────────▶ empty_body      (blank text)
//! format + write ────────▶ success
//! ```
//!
//! and reports exactly one [`Outcome`]. No per-paper failure escapes this
//! function; only the caller-held [`RunContext`] accumulates across papers.

use std::{fmt, io::Write};

use tempfile::TempDir;

use super::*;
use crate::{
  archive::ArchiveExtractor,
  fetch::{Pacer, SourceFetcher},
  format::BodyFormatter,
  latex::{self, InclusionExpander, Metadata},
  locate::MainFileLocator,
  roster::PaperDescriptor,
};

/// Extension of the per-paper artifacts.
pub const ARTIFACT_EXTENSION: &str = "txt";

/// Terminal state of one paper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
  /// Artifact written
  Success,
  /// Artifact already present, nothing done
  Skipped,
  /// No bundle available for the paper
  NoSource,
  /// The bundle matched no supported container format
  ExtractFailed,
  /// No main file, or no `\begin{document}` in it
  NoMainTex,
  /// The document body is blank
  EmptyBody,
}

impl Outcome {
  /// Every outcome, in reporting order.
  pub const ALL: [Outcome; 6] = [
    Outcome::Success,
    Outcome::Skipped,
    Outcome::NoSource,
    Outcome::ExtractFailed,
    Outcome::NoMainTex,
    Outcome::EmptyBody,
  ];

  /// The name used in summaries and logs.
  pub fn as_str(&self) -> &'static str {
    match self {
      Outcome::Success => "success",
      Outcome::Skipped => "skipped",
      Outcome::NoSource => "no_source",
      Outcome::ExtractFailed => "extract_failed",
      Outcome::NoMainTex => "no_main_tex",
      Outcome::EmptyBody => "empty_body",
    }
  }
}

impl fmt::Display for Outcome {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// Per-outcome counters for a run.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Statistics {
  /// Papers processed
  pub total:          usize,
  /// Papers with [`Outcome::Success`]
  pub success:        usize,
  /// Papers with [`Outcome::Skipped`]
  pub skipped:        usize,
  /// Papers with [`Outcome::NoSource`]
  pub no_source:      usize,
  /// Papers with [`Outcome::ExtractFailed`]
  pub extract_failed: usize,
  /// Papers with [`Outcome::NoMainTex`]
  pub no_main_tex:    usize,
  /// Papers with [`Outcome::EmptyBody`]
  pub empty_body:     usize,
}

impl Statistics {
  /// Counts one paper.
  pub fn count(&mut self, outcome: Outcome) {
    self.total += 1;
    *self.counter(outcome) += 1;
  }

  /// Number of papers that ended in `outcome`.
  pub fn get(&self, outcome: Outcome) -> usize {
    match outcome {
      Outcome::Success => self.success,
      Outcome::Skipped => self.skipped,
      Outcome::NoSource => self.no_source,
      Outcome::ExtractFailed => self.extract_failed,
      Outcome::NoMainTex => self.no_main_tex,
      Outcome::EmptyBody => self.empty_body,
    }
  }

  /// Percentage of processed papers that produced an artifact.
  pub fn success_rate(&self) -> f64 {
    if self.total == 0 {
      0.0
    } else {
      self.success as f64 / self.total as f64 * 100.0
    }
  }

  /// Mutable counter for `outcome`.
  fn counter(&mut self, outcome: Outcome) -> &mut usize {
    match outcome {
      Outcome::Success => &mut self.success,
      Outcome::Skipped => &mut self.skipped,
      Outcome::NoSource => &mut self.no_source,
      Outcome::ExtractFailed => &mut self.extract_failed,
      Outcome::NoMainTex => &mut self.no_main_tex,
      Outcome::EmptyBody => &mut self.empty_body,
    }
  }
}

/// What happened to one paper.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaperRecord {
  /// arXiv identifier
  pub arxiv_id:   String,
  /// Title as given in the roster
  pub title:      String,
  /// Relevance score as given in the roster
  pub score:      f64,
  /// Terminal state
  pub status:     Outcome,
  /// When processing finished
  pub timestamp:  DateTime<Local>,
  /// Artifact size in bytes, zero unless `status` is success
  pub size_bytes: usize,
  /// Artifact location as `papers/<file name>`, present on success only
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub path:       Option<String>,
}

impl PaperRecord {
  /// Creates a record for `paper` stamped with the current time.
  pub fn new(paper: &PaperDescriptor, status: Outcome, size_bytes: usize) -> Self {
    let path = (status == Outcome::Success).then(|| {
      format!("papers/{}", artifact_file_name(&paper.identifier))
    });
    Self {
      arxiv_id: paper.identifier.clone(),
      title: paper.title.clone(),
      score: paper.relevance_score,
      status,
      timestamp: Local::now(),
      size_bytes,
      path,
    }
  }
}

/// State accumulated over a run, passed into and returned from
/// [`PaperProcessor::run`].
///
/// Serializes to the run summary document:
///
/// ```json
/// {
///   "download_date": "2026-02-03T09:12:44.513+01:00",
///   "statistics": { "total": 2, "success": 1, "skipped": 0, "no_source": 1, ... },
///   "papers": [ { "arxiv_id": "2301.07041", "status": "success", ... }, ... ]
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunContext {
  /// When the run started
  pub download_date: DateTime<Local>,
  /// Per-outcome counters
  pub statistics:    Statistics,
  /// One record per processed paper, in processing order
  pub papers:        Vec<PaperRecord>,
}

impl Default for RunContext {
  fn default() -> Self { Self::new() }
}

impl RunContext {
  /// Starts a run now.
  pub fn new() -> Self {
    Self { download_date: Local::now(), statistics: Statistics::default(), papers: Vec::new() }
  }

  /// Counts `record` and appends it.
  pub fn record(&mut self, record: PaperRecord) {
    self.statistics.count(record.status);
    self.papers.push(record);
  }

  /// Writes the run summary as pretty-printed JSON, creating parent
  /// directories as needed.
  pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_string_pretty(self)?)?;
    info!("Run summary written to {}", path.display());
    Ok(())
  }

  /// Reads a previously saved run summary.
  pub fn load(path: impl AsRef<Path>) -> Result<Self> {
    Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
  }
}

/// A bundle unpacked into a temporary directory that is removed on drop.
#[derive(Debug)]
pub struct UnpackedSource {
  /// Scoped extraction directory
  workspace: TempDir,
  /// Main document inside `workspace`
  main_file: PathBuf,
}

impl UnpackedSource {
  /// Unpacks `data` and locates its main file.
  ///
  /// Fails with [`Outcome::ExtractFailed`] or [`Outcome::NoMainTex`].
  pub fn unpack(data: &[u8]) -> std::result::Result<Self, Outcome> {
    let workspace = tempfile::Builder::new().prefix("texmine_").tempdir().map_err(|e| {
      warn!("Could not create extraction directory: {e}");
      Outcome::ExtractFailed
    })?;
    if !ArchiveExtractor::new().extract(data, workspace.path()) {
      return Err(Outcome::ExtractFailed);
    }
    let main_file = MainFileLocator::new().find(workspace.path()).ok_or(Outcome::NoMainTex)?;
    Ok(Self { workspace, main_file })
  }

  /// Root of the extracted tree.
  pub fn root(&self) -> &Path { self.workspace.path() }

  /// The main document.
  pub fn main_file(&self) -> &Path { &self.main_file }

  /// Main document with comments stripped and inclusions expanded.
  pub fn flatten(&self) -> std::io::Result<String> {
    let content = self.read_main()?;
    Ok(latex::flatten(&content, &InclusionExpander::new(self.root()), self.base_dir()))
  }

  /// Metadata mined from the flattened main document.
  pub fn metadata(&self) -> std::io::Result<Metadata> {
    let content = self.read_main()?;
    Ok(latex::parse(&content, &InclusionExpander::new(self.root()), self.base_dir()))
  }

  /// Main document content, invalid UTF-8 replaced.
  fn read_main(&self) -> std::io::Result<String> {
    Ok(String::from_utf8_lossy(&fs::read(&self.main_file)?).into_owned())
  }

  /// Directory inclusions in the main document are resolved against.
  fn base_dir(&self) -> &Path { self.main_file.parent().unwrap_or_else(|| self.root()) }
}

/// File name of the artifact for `identifier`.
///
/// Old-style identifiers such as `hep-th/9901001` contain a slash, which is
/// replaced so every artifact lives directly in the output directory.
pub fn artifact_file_name(identifier: &str) -> String {
  format!("{}.{ARTIFACT_EXTENSION}", identifier.replace('/', "_"))
}

/// Removes every artifact in `output_dir`, returning how many were removed.
///
/// Used to force re-extraction, since existing artifacts are otherwise
/// never overwritten.
pub fn clean_stale_artifacts(output_dir: &Path) -> Result<usize> {
  if !output_dir.exists() {
    return Ok(0);
  }
  let mut removed = 0;
  for entry in fs::read_dir(output_dir)? {
    let path = entry?.path();
    if path.is_file() && path.extension().is_some_and(|ext| ext == ARTIFACT_EXTENSION) {
      fs::remove_file(&path)?;
      removed += 1;
    }
  }
  debug!("Removed {removed} stale artifacts from {}", output_dir.display());
  Ok(removed)
}

/// Drives papers through the pipeline and writes their artifacts.
#[derive(Debug)]
pub struct PaperProcessor<F> {
  /// Where artifacts are written
  output_dir: PathBuf,
  /// Source of bundles
  fetcher:    F,
  /// Body-to-text conversion
  formatter:  BodyFormatter,
  /// Politeness delay between fetches
  pacer:      Pacer,
}

impl<F: SourceFetcher> PaperProcessor<F> {
  /// Creates a processor, creating the output directory if needed.
  pub fn new(config: &Config, fetcher: F, formatter: BodyFormatter) -> Result<Self> {
    fs::create_dir_all(&config.output_dir)?;
    Ok(Self {
      output_dir: config.output_dir.clone(),
      fetcher,
      formatter,
      pacer: Pacer::new(config.request_delay()),
    })
  }

  /// Where the artifact for `identifier` is (or would be) written.
  pub fn artifact_path(&self, identifier: &str) -> PathBuf {
    self.output_dir.join(artifact_file_name(identifier))
  }

  /// Processes every paper in order, recording each outcome in `context`.
  pub async fn run(&mut self, papers: &[PaperDescriptor], context: RunContext) -> RunContext {
    self.run_with_progress(papers, context, |_, _, _| {}).await
  }

  /// Like [`run`](Self::run), calling `progress` with the zero-based index,
  /// the paper and its record after each paper.
  pub async fn run_with_progress<P>(
    &mut self,
    papers: &[PaperDescriptor],
    mut context: RunContext,
    mut progress: P,
  ) -> RunContext
  where
    P: FnMut(usize, &PaperDescriptor, &PaperRecord),
  {
    for (index, paper) in papers.iter().enumerate() {
      info!("[{}/{}] {}: {}", index + 1, papers.len(), paper.identifier, paper.title);
      let record = self.process(paper).await;
      progress(index, paper, &record);
      context.record(record);
    }
    context
  }

  /// Processes one paper.
  pub async fn process(&mut self, paper: &PaperDescriptor) -> PaperRecord {
    let (outcome, size) = self.pipeline(&paper.identifier).await;
    info!("{}: {outcome}", paper.identifier);
    PaperRecord::new(paper, outcome, size)
  }

  /// The pipeline proper, returning the outcome and artifact size.
  async fn pipeline(&mut self, identifier: &str) -> (Outcome, usize) {
    let artifact = self.artifact_path(identifier);
    if artifact.exists() {
      debug!("{identifier}: {} already exists", artifact.display());
      return (Outcome::Skipped, 0);
    }

    let data = match self.pacer.fetch(&self.fetcher, identifier).await {
      Ok(Some(data)) => data,
      Ok(None) => {
        debug!("{identifier}: no source bundle available");
        return (Outcome::NoSource, 0);
      },
      Err(e) => {
        warn!("{identifier}: source fetch failed: {e}");
        return (Outcome::NoSource, 0);
      },
    };

    let source = match UnpackedSource::unpack(&data) {
      Ok(source) => source,
      Err(outcome) => return (outcome, 0),
    };
    trace!("{identifier}: main file {}", source.main_file().display());

    let flattened = match source.flatten() {
      Ok(flattened) => flattened,
      Err(e) => {
        warn!("{identifier}: could not read main file: {e}");
        return (Outcome::NoMainTex, 0);
      },
    };

    let Some(body) = latex::extract_body(&flattened) else {
      debug!("{identifier}: main file has no \\begin{{document}}");
      return (Outcome::NoMainTex, 0);
    };
    if body.is_empty() {
      return (Outcome::EmptyBody, 0);
    }

    let text = self.formatter.format(&body).await;
    if text.trim().is_empty() {
      debug!("{identifier}: body formatted to nothing");
      return (Outcome::EmptyBody, 0);
    }
    match write_new(&artifact, &text) {
      Ok(()) => {
        info!("{identifier}: wrote {:.1} KB", text.len() as f64 / 1024.0);
        (Outcome::Success, text.len())
      },
      Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
        debug!("{identifier}: artifact appeared while processing, keeping it");
        (Outcome::Skipped, 0)
      },
      Err(e) => {
        warn!("{identifier}: could not write {}: {e}", artifact.display());
        (Outcome::ExtractFailed, 0)
      },
    }
  }
}

/// Writes `content` to `path`, failing if the file already exists.
fn write_new(path: &Path, content: &str) -> std::io::Result<()> {
  let mut file = fs::OpenOptions::new().write(true).create_new(true).open(path)?;
  file.write_all(content.as_bytes())
}
