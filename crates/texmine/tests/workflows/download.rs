use texmine::{
  archive::ArchiveExtractor,
  latex::{extract_keywords, strip_comments},
  processor::{clean_stale_artifacts, RunContext},
};

use super::*;

#[traced_test]
#[tokio::test]
async fn test_tar_gz_bundle_to_artifact() -> TestResult<()> {
  let server = MockServer::start().await;
  let bundle = tar_gz(&[("main.tex", PAPER), ("sections/method.tex", METHOD_SECTION)]);
  serve_bundle(&server, "2401.00001", 200, bundle).await;
  let (mut processor, config, _output) = create_test_processor(&server);

  let record = processor.process(&PaperDescriptor::new("2401.00001")).await;
  assert_eq!(record.status, Outcome::Success);

  let text = fs::read_to_string(artifact(&config, "2401.00001"))?;
  assert_eq!(record.size_bytes, text.len());
  assert!(text.contains("Sensor networks produce more data than they can transmit."));
  assert!(text.contains("We apply a Haar transform and keep the largest coefficients."));
  assert!(!text.contains("nothing else"));
  assert!(!text.contains("appendix text"));
  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_rerun_skips_and_preserves_artifact() -> TestResult<()> {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/e-print/2401.00001"))
    .respond_with(ResponseTemplate::new(200).set_body_bytes(tar_gz(&[("main.tex", PAPER)])))
    .expect(1)
    .mount(&server)
    .await;
  let (mut processor, config, _output) = create_test_processor(&server);
  let paper = PaperDescriptor::new("2401.00001");

  assert_eq!(processor.process(&paper).await.status, Outcome::Success);
  let first = fs::read(artifact(&config, "2401.00001"))?;

  let record = processor.process(&paper).await;
  assert_eq!(record.status, Outcome::Skipped);
  assert_eq!(fs::read(artifact(&config, "2401.00001"))?, first);
  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_run_summary() -> TestResult<()> {
  let server = MockServer::start().await;
  serve_bundle(&server, "2401.00001", 200, gzip(PAPER.as_bytes())).await;
  serve_bundle(&server, "2401.00002", 404, Vec::new()).await;
  serve_bundle(&server, "2401.00003", 500, Vec::new()).await;
  serve_bundle(&server, "2401.00004", 200, b"%PDF-1.5 not a source bundle".to_vec()).await;
  let (mut processor, config, _output) = create_test_processor(&server);

  let papers: Vec<_> = ["2401.00001", "2401.00002", "2401.00003", "2401.00004"]
    .into_iter()
    .map(PaperDescriptor::new)
    .collect();
  let context = processor.run(&papers, RunContext::new()).await;
  context.save(config.summary_path())?;

  let summary: serde_json::Value =
    serde_json::from_str(&fs::read_to_string(config.summary_path())?)?;
  assert_eq!(summary["statistics"]["total"], 4);
  assert_eq!(summary["statistics"]["success"], 1);
  assert_eq!(summary["statistics"]["no_source"], 2);
  assert_eq!(summary["statistics"]["extract_failed"], 1);
  assert_eq!(summary["papers"][0]["path"], "papers/2401.00001.txt");
  assert_eq!(summary["papers"][2]["status"], "no_source");
  assert!(summary["download_date"].is_string());
  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_clean_stale_forces_reextraction() -> TestResult<()> {
  let server = MockServer::start().await;
  serve_bundle(&server, "2401.00001", 200, PAPER.as_bytes().to_vec()).await;
  let (mut processor, config, _output) = create_test_processor(&server);
  fs::write(artifact(&config, "2401.00001"), "stale")?;

  assert_eq!(clean_stale_artifacts(&config.output_dir)?, 1);
  let record = processor.process(&PaperDescriptor::new("2401.00001")).await;

  assert_eq!(record.status, Outcome::Success);
  assert_ne!(fs::read_to_string(artifact(&config, "2401.00001"))?, "stale");
  Ok(())
}

#[test]
fn test_ieee_keywords_from_paper() {
  assert_eq!(
    extract_keywords(&strip_comments(PAPER)),
    vec!["signal processing", "wavelet transform", "compression"]
  );
}

#[test]
fn test_extraction_stays_inside_target() -> TestResult<()> {
  let outer = tempdir()?;
  let target = outer.path().join("target");
  fs::create_dir(&target)?;

  // tar::Builder refuses `..`, so the name is written into the header directly
  let mut header = tar::Header::new_gnu();
  header.as_old_mut().name[..13].copy_from_slice(b"../escape.tex");
  header.set_size(PAPER.len() as u64);
  header.set_mode(0o644);
  header.set_cksum();
  let mut builder = tar::Builder::new(GzEncoder::new(Vec::new(), Compression::default()));
  builder.append(&header, PAPER.as_bytes())?;
  let bundle = builder.into_inner()?.finish()?;

  assert!(!ArchiveExtractor::new().extract(&bundle, &target));
  assert!(!outer.path().join("escape.tex").exists());
  assert_eq!(fs::read_dir(&target)?.count(), 0);
  Ok(())
}
