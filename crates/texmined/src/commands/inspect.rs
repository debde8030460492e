//! Module for the "inspect" command, which runs the extraction steps on local
//! input without any network access.

use std::fs;

use texmine::{
  format::{BodyFormatter, Converter},
  latex::{self, extract_body, InclusionExpander, Metadata},
  locate::MainFileLocator,
  processor::{Outcome, UnpackedSource},
};

use super::*;

/// Function for the [`Commands::Inspect`] in the CLI.
pub async fn inspect(config: Config, args: InspectArgs) -> Result<()> {
  let InspectArgs { path, body, no_converter } = args;

  let flattened = if path.is_dir() {
    flatten_directory(&path)?
  } else {
    let data = fs::read(&path)?;
    let source = UnpackedSource::unpack(&data).map_err(|outcome| {
      TexminedError::Inspect(format!("{}: {}", path.display(), describe(outcome)))
    })?;
    report_main_file(source.main_file());
    source.flatten()?
  };

  if body {
    let Some(body) = extract_body(&flattened) else {
      return Err(TexminedError::Inspect(format!(
        "{}: main file has no \\begin{{document}}",
        path.display()
      )));
    };
    let converter = if no_converter { None } else { Converter::probe(&config.converter) };
    println!("{}", BodyFormatter::new(converter).format(&body).await);
  } else {
    let metadata = Metadata::from_source(&flattened);
    println!("{}", serde_json::to_string_pretty(&metadata)?);
  }
  Ok(())
}

/// Locates and flattens the main file of an extracted source tree.
fn flatten_directory(root: &Path) -> Result<String> {
  let main = MainFileLocator::new().find(root).ok_or_else(|| {
    TexminedError::Inspect(format!("{}: {}", root.display(), describe(Outcome::NoMainTex)))
  })?;
  report_main_file(&main);

  let content = String::from_utf8_lossy(&fs::read(&main)?).into_owned();
  let base_dir = main.parent().unwrap_or(root);
  Ok(latex::flatten(&content, &InclusionExpander::new(root), base_dir))
}

/// Tells the user which file was picked, on stderr so stdout stays parseable.
fn report_main_file(main: &Path) {
  eprintln!("{} Main file: {}", style(INFO_PREFIX).cyan(), style(main.display()).yellow());
}

/// Explanation for a bundle that could not be inspected.
fn describe(outcome: Outcome) -> &'static str {
  match outcome {
    Outcome::ExtractFailed => "not a tar.gz, gzip or LaTeX file",
    _ => "no .tex file containing \\documentclass",
  }
}
