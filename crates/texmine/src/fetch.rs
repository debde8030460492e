//! Source bundle retrieval.
//!
//! The [`SourceFetcher`] trait is the seam between the pipeline and the
//! network: [`ArxivSource`] implements it over HTTP, tests implement it over
//! in-memory maps. A missing bundle is not an error, it is `Ok(None)`.

use std::time::Instant;

use reqwest::StatusCode;

use super::*;

/// Retrieves the raw source bundle of a paper.
///
/// # Examples
///
/// ```no_run
/// use std::collections::HashMap;
///
/// use texmine::{error::Result, fetch::SourceFetcher};
///
/// struct InMemory(HashMap<String, Vec<u8>>);
///
/// #[async_trait::async_trait]
/// impl SourceFetcher for InMemory {
///   async fn fetch(&self, identifier: &str) -> Result<Option<Vec<u8>>> {
///     Ok(self.0.get(identifier).cloned())
///   }
/// }
/// ```
#[async_trait]
pub trait SourceFetcher: Send + Sync {
  /// Fetches the bundle for `identifier`.
  ///
  /// # Returns
  ///
  /// - `Ok(Some(bytes))` with the raw bundle
  /// - `Ok(None)` if the source has no bundle for this paper
  /// - `Err(_)` if the request itself failed
  async fn fetch(&self, identifier: &str) -> Result<Option<Vec<u8>>>;
}

/// Fetches bundles from arXiv's e-print endpoint (or any URL template).
#[derive(Debug, Clone)]
pub struct ArxivSource {
  /// Client carrying the user agent and request timeout
  client:       reqwest::Client,
  /// URL with an `{identifier}` placeholder
  url_template: String,
}

impl ArxivSource {
  /// Builds a fetcher from the run configuration.
  ///
  /// # Errors
  ///
  /// Returns [`TexmineError::Network`] if the HTTP client cannot be built.
  pub fn new(config: &Config) -> Result<Self> {
    let client = reqwest::Client::builder()
      .user_agent(&config.user_agent)
      .timeout(config.request_timeout())
      .build()?;
    Ok(Self { client, url_template: config.source_url_template.clone() })
  }

  /// URL the bundle for `identifier` is fetched from.
  pub fn url_for(&self, identifier: &str) -> String {
    self.url_template.replace(IDENTIFIER_PLACEHOLDER, identifier)
  }
}

#[async_trait]
impl SourceFetcher for ArxivSource {
  async fn fetch(&self, identifier: &str) -> Result<Option<Vec<u8>>> {
    let url = self.url_for(identifier);
    debug!("Fetching source bundle from {url}");

    let response = self.client.get(&url).send().await?;
    let status = response.status();
    if status == StatusCode::NOT_FOUND {
      return Ok(None);
    }
    if !status.is_success() {
      return Err(TexmineError::ApiError(format!(
        "Failed to fetch source for {identifier}: {status}"
      )));
    }

    let bytes = response.bytes().await?;
    trace!("Received {} bytes for {identifier}", bytes.len());
    Ok(Some(bytes.to_vec()))
  }
}

/// Enforces a minimum pause between consecutive fetches.
///
/// The first fetch is never delayed, and time already spent on other work
/// since the previous fetch counts towards the pause.
#[derive(Debug, Clone)]
pub struct Pacer {
  /// Minimum time between two fetches
  delay:      Duration,
  /// When the previous fetch finished
  last_fetch: Option<Instant>,
}

impl Pacer {
  /// Creates a pacer enforcing `delay`.
  pub fn new(delay: Duration) -> Self { Self { delay, last_fetch: None } }

  /// Runs `fetcher` for `identifier` once the pause has elapsed.
  pub async fn fetch<F: SourceFetcher + ?Sized>(
    &mut self,
    fetcher: &F,
    identifier: &str,
  ) -> Result<Option<Vec<u8>>> {
    if let Some(last) = self.last_fetch {
      let remaining = self.delay.saturating_sub(last.elapsed());
      if !remaining.is_zero() {
        debug!("Waiting {:.1}s before next fetch", remaining.as_secs_f64());
        tokio::time::sleep(remaining).await;
      }
    }
    let result = fetcher.fetch(identifier).await;
    self.last_fetch = Some(Instant::now());
    result
  }
}
