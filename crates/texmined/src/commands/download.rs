//! Module for the "download" command: roster in, one artifact per paper out.

use texmine::{
  fetch::ArxivSource,
  format::{BodyFormatter, Converter},
  processor::{
    clean_stale_artifacts, Outcome, PaperProcessor, PaperRecord, RunContext, Statistics,
  },
  roster::{load_roster, PaperDescriptor},
};

use super::*;

/// Function for the [`Commands::Download`] in the CLI.
pub async fn download(config: Config, args: DownloadArgs) -> Result<()> {
  let DownloadArgs { roster, output_dir, no_converter, clean_stale } = args;
  let mut config = config;
  if let Some(dir) = output_dir {
    config = config.with_output_dir(dir);
  }
  if no_converter {
    config = config.without_converter();
  }

  let papers = load_roster(&roster).map_err(|e| {
    eprintln!(
      "{} Could not load roster {}: {}",
      style(ERROR_PREFIX).red(),
      style(roster.display()).yellow(),
      e
    );
    e
  })?;
  println!(
    "{} Found {} papers to process",
    style(INFO_PREFIX).cyan(),
    style(papers.len()).green()
  );
  if papers.is_empty() {
    println!("{} No papers to download", style(WARNING_PREFIX).yellow());
    return Ok(());
  }

  if clean_stale {
    let removed = clean_stale_artifacts(&config.output_dir)?;
    println!("{} Removed {} stale artifacts", style(INFO_PREFIX).cyan(), style(removed).yellow());
  }

  let formatter = BodyFormatter::new(Converter::probe(&config.converter));
  if !formatter.has_converter() {
    println!(
      "{} No external converter, bodies will be converted to plain text",
      style(WARNING_PREFIX).yellow()
    );
  }
  let mut processor = PaperProcessor::new(&config, ArxivSource::new(&config)?, formatter)?;

  let total = papers.len();
  let context = processor
    .run_with_progress(&papers, RunContext::new(), |index, paper, record| {
      print_progress(index, total, paper, record)
    })
    .await;

  context.save(config.summary_path())?;
  print_summary(&context.statistics, &config.output_dir);
  Ok(())
}

/// Prints the outcome of one paper.
fn print_progress(index: usize, total: usize, paper: &PaperDescriptor, record: &PaperRecord) {
  println!(
    "{} [{}/{}] {}: {}",
    style(INFO_PREFIX).cyan(),
    index + 1,
    total,
    style(&paper.identifier).yellow(),
    truncate(&paper.title, 60)
  );
  match record.status {
    Outcome::Success => println!(
      "   {} Extracted {:.1} KB",
      style(SUCCESS_PREFIX).green(),
      record.size_bytes as f64 / 1024.0
    ),
    Outcome::Skipped => println!("   {} Already extracted, skipping", style(INFO_PREFIX).cyan()),
    status => println!("   {} {}", style(WARNING_PREFIX).yellow(), describe(status)),
  }
}

/// Human-readable explanation of a failed outcome.
fn describe(outcome: Outcome) -> &'static str {
  match outcome {
    Outcome::NoSource => "No LaTeX source available",
    Outcome::ExtractFailed => "Could not extract source bundle",
    Outcome::NoMainTex => "No main .tex file found",
    Outcome::EmptyBody => "Document body is empty",
    Outcome::Success | Outcome::Skipped => "",
  }
}

/// At most `max` characters of `text`, with an ellipsis if anything was cut.
fn truncate(text: &str, max: usize) -> String {
  match text.char_indices().nth(max) {
    Some((cut, _)) => format!("{}...", &text[..cut]),
    None => text.to_string(),
  }
}

/// Prints the per-outcome counts.
fn print_summary(statistics: &Statistics, output_dir: &Path) {
  println!("\n{}", style("Download summary").bold());
  println!("   Total papers:        {}", statistics.total);
  println!(
    "   Successfully parsed: {} ({:.1}%)",
    style(statistics.success).green(),
    statistics.success_rate()
  );
  println!("   Skipped (existing):  {}", statistics.skipped);
  println!("   No source:           {}", statistics.no_source);
  println!("   Extraction failed:   {}", statistics.extract_failed);
  println!("   No main .tex:        {}", statistics.no_main_tex);
  println!("   Empty body:          {}", statistics.empty_body);
  println!("{} Papers saved to {}", style(INFO_PREFIX).cyan(), style(output_dir.display()).yellow());
}
