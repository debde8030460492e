//! Body-to-text conversion.
//!
//! A [`BodyFormatter`] prefers an external structured-text converter (pandoc
//! by default) and falls back to [`clean_latex`] whenever the converter is
//! absent or fails. Whether the converter exists is decided once, by
//! [`Converter::probe`], and injected into the formatter.
//!
//! # Examples
//!
//! ```no_run
//! use texmine::{
//!   config::Config,
//!   format::{BodyFormatter, Converter},
//! };
//!
//! # async fn example() {
//! let config = Config::default();
//! let formatter = BodyFormatter::new(Converter::probe(&config.converter));
//! let text = formatter.format(r"\section{Intro} Some \emph{text}.").await;
//! println!("{text}");
//! # }
//! ```

use std::process::Stdio;

use thiserror::Error;
use tokio::{io::AsyncWriteExt, process::Command};

use super::*;
use crate::latex::clean_latex;

/// Reasons a conversion attempt was abandoned.
#[derive(Error, Debug)]
pub enum ConversionError {
  /// The converter could not be started or its pipes failed.
  #[error("converter could not run: {0}")]
  Io(#[from] std::io::Error),
  /// The converter ran past its deadline and was killed.
  #[error("converter timed out after {0:?}")]
  Timeout(Duration),
  /// The converter exited unsuccessfully.
  #[error("converter exited with {0}")]
  Failed(std::process::ExitStatus),
  /// The converter succeeded but printed nothing.
  #[error("converter produced no output")]
  EmptyOutput,
}

/// An external converter reading LaTeX on stdin and writing text to stdout.
#[derive(Debug, Clone)]
pub struct Converter {
  /// Executable to run
  program: PathBuf,
  /// Arguments passed on every run
  args:    Vec<String>,
  /// Deadline for a single conversion
  timeout: Duration,
}

impl Converter {
  /// Creates a converter without checking that `program` exists.
  pub fn new(program: impl Into<PathBuf>, args: Vec<String>, timeout: Duration) -> Self {
    Self { program: program.into(), args, timeout }
  }

  /// Looks the configured program up on `PATH`.
  ///
  /// Returns `None` if the converter is disabled or cannot be found, in which
  /// case bodies are converted with [`clean_latex`].
  pub fn probe(config: &ConverterConfig) -> Option<Self> {
    if !config.enabled {
      debug!("External converter disabled");
      return None;
    }
    match which::which(&config.program) {
      Ok(program) => {
        info!("Using {} for body conversion", program.display());
        Some(Self::new(program, config.args.clone(), config.timeout()))
      },
      Err(e) => {
        warn!("{} not available ({e}), bodies will be converted to plain text", config.program);
        None
      },
    }
  }

  /// Runs the converter over `body`.
  pub async fn convert(&self, body: &str) -> std::result::Result<String, ConversionError> {
    let mut child = Command::new(&self.program)
      .args(&self.args)
      .stdin(Stdio::piped())
      .stdout(Stdio::piped())
      .stderr(Stdio::piped())
      .kill_on_drop(true)
      .spawn()?;

    if let Some(mut stdin) = child.stdin.take() {
      let input = body.to_owned();
      // stdin is fed while stdout is being drained
      tokio::spawn(async move {
        if let Err(e) = stdin.write_all(input.as_bytes()).await {
          trace!("Converter stopped reading input: {e}");
        }
      });
    }

    let output = tokio::time::timeout(self.timeout, child.wait_with_output())
      .await
      .map_err(|_| ConversionError::Timeout(self.timeout))??;

    if !output.status.success() {
      trace!("Converter stderr: {}", String::from_utf8_lossy(&output.stderr));
      return Err(ConversionError::Failed(output.status));
    }
    let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if text.is_empty() {
      return Err(ConversionError::EmptyOutput);
    }
    Ok(text)
  }
}

/// Turns an extracted body into readable text.
#[derive(Debug, Clone, Default)]
pub struct BodyFormatter {
  /// The external converter, if one was found at startup
  converter: Option<Converter>,
}

impl BodyFormatter {
  /// Creates a formatter using `converter` when present.
  pub fn new(converter: Option<Converter>) -> Self { Self { converter } }

  /// Creates a formatter that only ever uses [`clean_latex`].
  pub fn plain() -> Self { Self::default() }

  /// Whether an external converter will be tried first.
  pub fn has_converter(&self) -> bool { self.converter.is_some() }

  /// Converts `body`. Never fails; the plain-text path is always available.
  pub async fn format(&self, body: &str) -> String {
    if let Some(converter) = &self.converter {
      match converter.convert(body).await {
        Ok(text) => return text,
        Err(e) => warn!("{e}, falling back to plain-text extraction"),
      }
    }
    clean_latex(body)
  }
}

#[cfg(all(test, unix))]
mod tests {
  use super::*;

  const BODY: &str = r"\section{Intro} Some \emph{text} with $x$ math.";

  fn converter(program: &str, args: &[&str], timeout: Duration) -> Converter {
    Converter::new(program, args.iter().map(|a| a.to_string()).collect(), timeout)
  }

  #[traced_test]
  #[tokio::test]
  async fn test_successful_conversion_is_used() {
    let formatter = BodyFormatter::new(Some(converter("cat", &[], Duration::from_secs(5))));
    assert!(formatter.has_converter());
    assert_eq!(formatter.format(&format!("  {BODY}\n")).await, BODY);
  }

  #[traced_test]
  #[tokio::test]
  async fn test_failing_converter_falls_back() {
    let formatter = BodyFormatter::new(Some(converter("false", &[], Duration::from_secs(5))));
    assert_eq!(formatter.format(BODY).await, "Some text with math.");
    assert!(logs_contain("falling back to plain-text extraction"));
  }

  #[traced_test]
  #[tokio::test]
  async fn test_empty_output_falls_back() {
    let formatter = BodyFormatter::new(Some(converter("true", &[], Duration::from_secs(5))));
    assert_eq!(formatter.format(BODY).await, "Some text with math.");
  }

  #[traced_test]
  #[tokio::test]
  async fn test_timeout_falls_back() {
    let slow = converter("sleep", &["10"], Duration::from_millis(200));
    let start = std::time::Instant::now();

    assert!(matches!(slow.convert(BODY).await, Err(ConversionError::Timeout(_))));
    assert!(start.elapsed() < Duration::from_secs(5));
    assert_eq!(BodyFormatter::new(Some(slow)).format(BODY).await, "Some text with math.");
  }

  #[traced_test]
  #[tokio::test]
  async fn test_missing_program_falls_back() {
    let missing = converter("/nonexistent/texmine-converter", &[], Duration::from_secs(5));
    assert!(matches!(missing.convert(BODY).await, Err(ConversionError::Io(_))));
    assert_eq!(BodyFormatter::new(Some(missing)).format(BODY).await, "Some text with math.");
  }

  #[tokio::test]
  async fn test_plain_formatter() {
    let formatter = BodyFormatter::plain();
    assert!(!formatter.has_converter());
    assert_eq!(formatter.format(BODY).await, "Some text with math.");
  }

  #[traced_test]
  #[test]
  fn test_probe() {
    let mut config = ConverterConfig { program: "sh".into(), ..Default::default() };
    assert!(Converter::probe(&config).is_some());

    config.enabled = false;
    assert!(Converter::probe(&config).is_none());

    config.enabled = true;
    config.program = "texmine-no-such-converter".into();
    assert!(Converter::probe(&config).is_none());
  }
}
