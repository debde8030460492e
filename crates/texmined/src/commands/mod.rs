use super::*;

pub mod download;
pub mod enrich;
pub mod inspect;

pub use download::download;
pub use enrich::enrich;
pub use inspect::inspect;

/// Available commands for the CLI
#[derive(Subcommand, Clone)]
pub enum Commands {
  /// Fetch source bundles for a roster of papers and write one text file per
  /// paper
  Download(DownloadArgs),

  /// Attach LaTeX metadata to a JSON list of papers
  Enrich(EnrichArgs),

  /// Show what would be extracted from a local bundle or directory
  Inspect(InspectArgs),
}

/// Options for [`Commands::Download`]
#[derive(Args, Clone)]
pub struct DownloadArgs {
  /// Roster JSON: an array of papers or an object with a
  /// `scored_papers_summary` array
  pub roster: PathBuf,

  /// Directory receiving the artifacts and the run summary
  #[arg(long)]
  pub output_dir: Option<PathBuf>,

  /// Never run the external converter, use plain-text extraction only
  #[arg(long)]
  pub no_converter: bool,

  /// Remove existing artifacts first so every paper is extracted again
  #[arg(long)]
  pub clean_stale: bool,
}

/// Options for [`Commands::Enrich`]
#[derive(Args, Clone)]
pub struct EnrichArgs {
  /// JSON array of paper objects, each with an `arxiv_id`
  pub papers: PathBuf,

  /// Where to write the enriched list (defaults to overwriting the input)
  #[arg(long, short)]
  pub output: Option<PathBuf>,
}

/// Options for [`Commands::Inspect`]
#[derive(Args, Clone)]
pub struct InspectArgs {
  /// A source bundle (tar.gz, gz or .tex) or an already extracted directory
  pub path: PathBuf,

  /// Print the formatted body instead of the metadata
  #[arg(long)]
  pub body: bool,

  /// Never run the external converter, use plain-text extraction only
  #[arg(long)]
  pub no_converter: bool,
}
