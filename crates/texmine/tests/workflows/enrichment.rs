use serde_json::json;
use texmine::enrich::{load_papers, save_papers, MetadataEnricher, METADATA_KEY};

use super::*;

#[traced_test]
#[tokio::test]
async fn test_enrich_filtered_papers_file() -> TestResult<()> {
  let server = MockServer::start().await;
  let bundle = tar_gz(&[("ms.tex", PAPER), ("sections/method.tex", METHOD_SECTION)]);
  serve_bundle(&server, "2401.00001", 200, bundle).await;
  serve_bundle(&server, "2401.00002", 404, Vec::new()).await;

  let dir = tempdir()?;
  let config = test_config(&server, dir.path());
  let path = dir.path().join("filtered_papers.json");
  save_papers(
    &[
      json!({"arxiv_id": "2401.00001", "title": "Wavelets", "topics": ["signal"]}),
      json!({"arxiv_id": "2401.00002", "title": "PDF only"}),
    ],
    &path,
  )?;

  let mut papers = load_papers(&path)?;
  let mut enricher = MetadataEnricher::new(&config, ArxivSource::new(&config)?);
  enricher.enrich(&mut papers).await;
  save_papers(&papers, &path)?;

  let papers = load_papers(&path)?;
  let metadata = &papers[0][METADATA_KEY];
  assert_eq!(metadata["title"], "Wavelet Compression of Sensor Streams");
  assert_eq!(metadata["authors"], json!(["Ada Lovelace", "Charles Babbage"]));
  assert_eq!(metadata["keywords"], json!(["signal processing", "wavelet transform", "compression"]));
  assert_eq!(metadata["abstract"], "We compress sensor streams with wavelets.");
  assert_eq!(metadata["introduction"], "Sensor networks produce more data than they can transmit.");
  assert_eq!(papers[0]["topics"], json!(["signal"]));
  assert!(papers[1].get(METADATA_KEY).is_none());

  let statistics = enricher.statistics();
  assert_eq!((statistics.total, statistics.success, statistics.failed), (2, 1, 1));
  Ok(())
}
