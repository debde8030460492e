//! Attaching LaTeX metadata to paper lists.
//!
//! The enricher takes the JSON list of papers kept after filtering, fetches
//! each paper's source, and stores the mined [`Metadata`] under a
//! `latex_metadata` key. Every other field of a paper object is kept as-is.
//!
//! # Examples
//!
//! ```no_run
//! use texmine::{
//!   config::Config,
//!   enrich::{load_papers, save_papers, MetadataEnricher},
//!   fetch::ArxivSource,
//! };
//!
//! # async fn example() -> texmine::error::Result<()> {
//! let config = Config::default();
//! let mut papers = load_papers("filtered_papers.json")?;
//!
//! let mut enricher = MetadataEnricher::new(&config, ArxivSource::new(&config)?);
//! enricher.enrich(&mut papers).await;
//! save_papers(&papers, "filtered_papers.json")?;
//!
//! println!("{} papers enriched", enricher.statistics().success);
//! # Ok(())
//! # }
//! ```

use serde_json::Value;

use super::*;
use crate::{
  fetch::{Pacer, SourceFetcher},
  latex::Metadata,
  processor::UnpackedSource,
};

/// Key under which metadata is attached to a paper object.
pub const METADATA_KEY: &str = "latex_metadata";

/// Counters for an enrichment run.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EnrichmentStatistics {
  /// Papers looked at
  pub total:   usize,
  /// Papers with keywords or an introduction
  pub success: usize,
  /// Papers parsed without finding anything useful
  pub skipped: usize,
  /// Papers whose source could not be obtained or read
  pub failed:  usize,
}

impl EnrichmentStatistics {
  /// Percentage of papers that gained useful metadata.
  pub fn success_rate(&self) -> f64 {
    if self.total == 0 {
      0.0
    } else {
      self.success as f64 / self.total as f64 * 100.0
    }
  }
}

/// Fetches sources and mines them for [`Metadata`].
#[derive(Debug)]
pub struct MetadataEnricher<F> {
  /// Source of bundles
  fetcher:    F,
  /// Politeness delay between fetches
  pacer:      Pacer,
  /// Counters so far
  statistics: EnrichmentStatistics,
}

impl<F: SourceFetcher> MetadataEnricher<F> {
  /// Creates an enricher using the configured request delay.
  pub fn new(config: &Config, fetcher: F) -> Self {
    Self {
      fetcher,
      pacer: Pacer::new(config.request_delay()),
      statistics: EnrichmentStatistics::default(),
    }
  }

  /// Counters for the papers seen so far.
  pub fn statistics(&self) -> &EnrichmentStatistics { &self.statistics }

  /// Attaches metadata to every paper that yields any.
  ///
  /// Papers whose source cannot be obtained are left untouched. Papers
  /// without a string `arxiv_id` are counted as failed.
  pub async fn enrich(&mut self, papers: &mut [Value]) {
    let total = papers.len();
    for (index, paper) in papers.iter_mut().enumerate() {
      let Some(identifier) = paper.get("arxiv_id").and_then(Value::as_str).map(str::to_owned)
      else {
        warn!("Paper #{} has no arxiv_id, skipping", index + 1);
        self.statistics.total += 1;
        self.statistics.failed += 1;
        continue;
      };
      info!("[{}/{}] {identifier}", index + 1, total);

      if let Some(metadata) = self.extract(&identifier).await {
        match serde_json::to_value(&metadata) {
          Ok(value) =>
            if let Some(object) = paper.as_object_mut() {
              object.insert(METADATA_KEY.to_string(), value);
            },
          Err(e) => warn!("{identifier}: could not serialize metadata: {e}"),
        }
      }
    }
  }

  /// Mines one paper, counting the result.
  ///
  /// Returns the metadata even when it holds nothing useful; returns `None`
  /// only if the source could not be obtained or read.
  pub async fn extract(&mut self, identifier: &str) -> Option<Metadata> {
    self.statistics.total += 1;

    let data = match self.pacer.fetch(&self.fetcher, identifier).await {
      Ok(Some(data)) => data,
      Ok(None) => {
        warn!("{identifier}: no source available");
        self.statistics.failed += 1;
        return None;
      },
      Err(e) => {
        warn!("{identifier}: source fetch failed: {e}");
        self.statistics.failed += 1;
        return None;
      },
    };

    let metadata = match UnpackedSource::unpack(&data) {
      Ok(source) => source.metadata(),
      Err(outcome) => {
        warn!("{identifier}: {outcome}");
        self.statistics.failed += 1;
        return None;
      },
    };
    let metadata = match metadata {
      Ok(metadata) => metadata,
      Err(e) => {
        warn!("{identifier}: could not read main file: {e}");
        self.statistics.failed += 1;
        return None;
      },
    };

    if metadata.has_content() {
      info!(
        "{identifier}: {} keywords, {} chars of introduction",
        metadata.keywords.len(),
        metadata.introduction.chars().count()
      );
      self.statistics.success += 1;
    } else {
      info!("{identifier}: no keywords or introduction found");
      self.statistics.skipped += 1;
    }
    Some(metadata)
  }
}

/// Reads a JSON array of paper objects.
pub fn load_papers(path: impl AsRef<Path>) -> Result<Vec<Value>> {
  let content = fs::read_to_string(path)?;
  Ok(serde_json::from_str(&content)?)
}

/// Writes a JSON array of paper objects, pretty-printed.
pub fn save_papers(papers: &[Value], path: impl AsRef<Path>) -> Result<()> {
  let path = path.as_ref();
  if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
    fs::create_dir_all(parent)?;
  }
  fs::write(path, serde_json::to_string_pretty(papers)?)?;
  Ok(())
}
