//! Module for the "enrich" command.

use texmine::{
  enrich::{load_papers, save_papers, EnrichmentStatistics, MetadataEnricher},
  fetch::ArxivSource,
};

use super::*;

/// Function for the [`Commands::Enrich`] in the CLI.
pub async fn enrich(config: Config, args: EnrichArgs) -> Result<()> {
  let EnrichArgs { papers: input, output } = args;

  let mut papers = load_papers(&input).map_err(|e| {
    eprintln!(
      "{} Could not load papers from {}: {}",
      style(ERROR_PREFIX).red(),
      style(input.display()).yellow(),
      e
    );
    e
  })?;
  println!(
    "{} Loaded {} papers from {}",
    style(INFO_PREFIX).cyan(),
    style(papers.len()).green(),
    style(input.display()).yellow()
  );

  let mut enricher = MetadataEnricher::new(&config, ArxivSource::new(&config)?);
  enricher.enrich(&mut papers).await;

  let output = output.unwrap_or(input);
  save_papers(&papers, &output)?;
  print_summary(enricher.statistics());
  println!(
    "{} Saved enriched papers to {}",
    style(SUCCESS_PREFIX).green(),
    style(output.display()).yellow()
  );
  Ok(())
}

/// Prints the enrichment counters.
fn print_summary(statistics: &EnrichmentStatistics) {
  println!("\n{}", style("LaTeX extraction summary").bold());
  println!("   Total papers:   {}", statistics.total);
  println!(
    "   Enriched:       {} ({:.1}%)",
    style(statistics.success).green(),
    statistics.success_rate()
  );
  println!("   No useful data: {}", statistics.skipped);
  println!("   Failed:         {}", statistics.failed);
}
