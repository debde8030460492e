//! Run configuration.
//!
//! A [`Config`] is read from a TOML file; every field has a default, so a
//! partial file (or no file at all) is valid. Individual fields can be
//! overridden with the `with_*` builder methods.
//!
//! ```toml
//! output_dir = "/srv/digest/papers"
//! request_delay_secs = 3.0
//!
//! [converter]
//! program = "pandoc"
//! timeout_secs = 30
//! ```

use super::*;

/// Placeholder substituted with the paper identifier in URL templates.
pub const IDENTIFIER_PLACEHOLDER: &str = "{identifier}";

/// Configuration for one processing run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
  /// Directory receiving one `<identifier>.txt` artifact per paper
  pub output_dir:           PathBuf,
  /// Run summary location; relative paths are resolved against `output_dir`
  pub summary_file:         PathBuf,
  /// Source bundle URL, `{identifier}` is replaced by the paper identifier
  pub source_url_template:  String,
  /// `User-Agent` sent with every request
  pub user_agent:           String,
  /// Minimum pause between two consecutive source fetches, in seconds
  pub request_delay_secs:   f64,
  /// Timeout for a single source fetch, in seconds
  pub request_timeout_secs: u64,
  /// External body converter settings
  pub converter:            ConverterConfig,
}

/// Settings for the optional external LaTeX converter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ConverterConfig {
  /// Whether the converter may be used at all
  pub enabled:      bool,
  /// Program name (looked up on `PATH`) or path to the executable
  pub program:      String,
  /// Arguments passed to the program; the body arrives on stdin
  pub args:         Vec<String>,
  /// Upper bound on a single conversion, in seconds
  pub timeout_secs: u64,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      output_dir:           Self::default_output_dir(),
      summary_file:         PathBuf::from("download_metadata.json"),
      source_url_template:  format!("https://arxiv.org/e-print/{IDENTIFIER_PLACEHOLDER}"),
      user_agent:           format!("texmine/{} (Academic Research)", env!("CARGO_PKG_VERSION")),
      request_delay_secs:   3.0,
      request_timeout_secs: 30,
      converter:            ConverterConfig::default(),
    }
  }
}

impl Default for ConverterConfig {
  fn default() -> Self {
    Self {
      enabled:      true,
      program:      "pandoc".to_string(),
      args:         ["-f", "latex", "-t", "markdown", "--wrap=none"]
        .into_iter()
        .map(String::from)
        .collect(),
      timeout_secs: 30,
    }
  }
}

impl ConverterConfig {
  /// Upper bound on a single conversion.
  pub fn timeout(&self) -> Duration { Duration::from_secs(self.timeout_secs) }
}

impl Config {
  /// Returns the default location of the configuration file.
  ///
  /// - On Unix: `~/.config/texmine/config.toml`
  /// - On macOS: `~/Library/Application Support/texmine/config.toml`
  /// - Fallback: `./texmine/config.toml`
  pub fn default_path() -> PathBuf {
    dirs::config_dir().unwrap_or_else(|| PathBuf::from(".")).join("texmine").join("config.toml")
  }

  /// Returns the default artifact directory, `<data_dir>/texmine/papers`.
  pub fn default_output_dir() -> PathBuf {
    dirs::data_dir().unwrap_or_else(|| PathBuf::from(".")).join("texmine").join("papers")
  }

  /// Loads a configuration file, falling back to defaults if it does not exist.
  ///
  /// # Errors
  ///
  /// Returns an error if the file exists but cannot be read, is not valid
  /// TOML, or describes an invalid configuration.
  pub fn load(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    if !path.exists() {
      debug!("No configuration at {}, using defaults", path.display());
      return Ok(Self::default());
    }
    let content = fs::read_to_string(path)?;
    Self::from_toml_str(&content)
  }

  /// Parses a configuration from a TOML string.
  pub fn from_toml_str(content: &str) -> Result<Self> {
    let config: Config = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
  }

  /// Overrides the artifact directory.
  pub fn with_output_dir(mut self, dir: impl AsRef<Path>) -> Self {
    self.output_dir = dir.as_ref().to_path_buf();
    self
  }

  /// Overrides the source URL template.
  pub fn with_source_url_template(mut self, template: impl Into<String>) -> Self {
    self.source_url_template = template.into();
    self
  }

  /// Overrides the pause between consecutive fetches.
  pub fn with_request_delay(mut self, delay: Duration) -> Self {
    self.request_delay_secs = delay.as_secs_f64();
    self
  }

  /// Disables the external converter for this run.
  pub fn without_converter(mut self) -> Self {
    self.converter.enabled = false;
    self
  }

  /// Resolved location of the run summary.
  pub fn summary_path(&self) -> PathBuf {
    if self.summary_file.is_absolute() {
      self.summary_file.clone()
    } else {
      self.output_dir.join(&self.summary_file)
    }
  }

  /// Minimum pause between consecutive fetches.
  pub fn request_delay(&self) -> Duration {
    Duration::try_from_secs_f64(self.request_delay_secs).unwrap_or(Duration::ZERO)
  }

  /// Timeout applied to each source fetch.
  pub fn request_timeout(&self) -> Duration { Duration::from_secs(self.request_timeout_secs) }

  /// Checks invariants serde cannot express.
  pub fn validate(&self) -> Result<()> {
    if !self.source_url_template.contains(IDENTIFIER_PLACEHOLDER) {
      return Err(TexmineError::Config(format!(
        "source_url_template must contain {IDENTIFIER_PLACEHOLDER}: {}",
        self.source_url_template
      )));
    }
    if !self.request_delay_secs.is_finite() || self.request_delay_secs < 0.0 {
      return Err(TexmineError::Config(format!(
        "request_delay_secs must be a non-negative number, got {}",
        self.request_delay_secs
      )));
    }
    if self.converter.enabled && self.converter.program.trim().is_empty() {
      return Err(TexmineError::Config("converter.program is empty".into()));
    }
    Ok(())
  }
}
