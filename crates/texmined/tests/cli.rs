//! Integration tests for the texmine CLI commands.
//!
//! Everything here runs offline: papers either already have an artifact or
//! come from local files.

use std::{fs, io::Write, path::PathBuf};

use assert_cmd::Command;
use flate2::{write::GzEncoder, Compression};
use predicates::prelude::*;
use serial_test::serial;
use tempfile::{tempdir, TempDir};

const PAPER: &str = r"\documentclass{article}
\title{Cache-Oblivious Merging}
\author{Grace Hopper \and Alan Turing}
\begin{document}
\begin{abstract}
Merging without knowing the cache size.
\end{abstract}
\section{Introduction}
Memory hierarchies are deep.
\appendix
\section{Omitted proofs}
Appendix-only sentence.
\end{document}
";

// Helper function to create a clean command instance
fn texmine(workdir: &TempDir) -> Command {
  let mut cmd = Command::cargo_bin("texmine").unwrap();
  cmd.arg("--config").arg(workdir.path().join("absent.toml"));
  cmd
}

fn tar_gz(files: &[(&str, &str)]) -> Vec<u8> {
  let mut builder = tar::Builder::new(GzEncoder::new(Vec::new(), Compression::default()));
  for (name, content) in files {
    let mut header = tar::Header::new_gnu();
    header.set_size(content.len() as u64);
    header.set_mode(0o644);
    header.set_cksum();
    builder.append_data(&mut header, name, content.as_bytes()).unwrap();
  }
  let mut encoder = builder.into_inner().unwrap();
  encoder.flush().unwrap();
  encoder.finish().unwrap()
}

fn write_roster(dir: &TempDir, json: &str) -> PathBuf {
  let path = dir.path().join("roster.json");
  fs::write(&path, json).unwrap();
  path
}

#[test]
fn test_help_lists_commands() {
  let dir = tempdir().unwrap();
  texmine(&dir)
    .arg("--help")
    .assert()
    .success()
    .stdout(predicate::str::contains("download"))
    .stdout(predicate::str::contains("enrich"))
    .stdout(predicate::str::contains("inspect"));
}

#[test]
fn test_inspect_directory_prints_metadata() {
  let dir = tempdir().unwrap();
  let tree = dir.path().join("tree");
  fs::create_dir(&tree).unwrap();
  fs::write(tree.join("paper.tex"), PAPER).unwrap();

  let output = texmine(&dir).arg("inspect").arg(&tree).output().unwrap();
  assert!(output.status.success());

  let metadata: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(metadata["title"], "Cache-Oblivious Merging");
  assert_eq!(metadata["authors"], serde_json::json!(["Grace Hopper", "Alan Turing"]));
  assert_eq!(metadata["introduction"], "Memory hierarchies are deep.");
}

#[test]
fn test_inspect_bundle_body() {
  let dir = tempdir().unwrap();
  let bundle = dir.path().join("2401.00001.tar.gz");
  fs::write(&bundle, tar_gz(&[("src/main.tex", PAPER)])).unwrap();

  texmine(&dir)
    .arg("inspect")
    .arg(&bundle)
    .arg("--body")
    .arg("--no-converter")
    .assert()
    .success()
    .stdout(predicate::str::contains("Memory hierarchies are deep."))
    .stdout(predicate::str::contains("Appendix-only").not());
}

#[test]
fn test_inspect_without_document_fails() {
  let dir = tempdir().unwrap();
  let tree = dir.path().join("tree");
  fs::create_dir(&tree).unwrap();
  fs::write(tree.join("macros.tex"), r"\newcommand{\R}{\mathbb{R}}").unwrap();

  texmine(&dir).arg("inspect").arg(&tree).assert().failure();
}

#[test]
#[serial]
fn test_download_missing_roster_fails() {
  let dir = tempdir().unwrap();
  texmine(&dir)
    .arg("download")
    .arg(dir.path().join("missing.json"))
    .arg("--output-dir")
    .arg(dir.path().join("papers"))
    .assert()
    .failure()
    .stderr(predicate::str::contains("Could not load roster"));
}

#[test]
#[serial]
fn test_download_malformed_roster_fails() {
  let dir = tempdir().unwrap();
  let roster = write_roster(&dir, r#"{"papers": "not a list"}"#);
  texmine(&dir)
    .arg("download")
    .arg(&roster)
    .arg("--output-dir")
    .arg(dir.path().join("papers"))
    .assert()
    .failure();
}

#[test]
#[serial]
fn test_download_empty_roster() {
  let dir = tempdir().unwrap();
  let roster = write_roster(&dir, r#"{"scored_papers_summary": []}"#);
  texmine(&dir)
    .arg("download")
    .arg(&roster)
    .arg("--output-dir")
    .arg(dir.path().join("papers"))
    .assert()
    .success()
    .stdout(predicate::str::contains("No papers to download"));
}

#[test]
#[serial]
fn test_download_skips_existing_artifacts() {
  let dir = tempdir().unwrap();
  let papers = dir.path().join("papers");
  fs::create_dir(&papers).unwrap();
  fs::write(papers.join("2401.00001.txt"), "already here").unwrap();
  let roster = write_roster(&dir, r#"[{"arxiv_id": "2401.00001", "title": "Existing", "score": 7.5}]"#);

  texmine(&dir)
    .arg("download")
    .arg(&roster)
    .arg("--output-dir")
    .arg(&papers)
    .arg("--no-converter")
    .assert()
    .success()
    .stdout(predicate::str::contains("Already extracted"))
    .stdout(predicate::str::contains("Skipped (existing):  1"));

  assert_eq!(fs::read_to_string(papers.join("2401.00001.txt")).unwrap(), "already here");
  let summary: serde_json::Value =
    serde_json::from_str(&fs::read_to_string(papers.join("download_metadata.json")).unwrap())
      .unwrap();
  assert_eq!(summary["statistics"]["skipped"], 1);
  assert_eq!(summary["papers"][0]["score"], 7.5);
}

#[test]
#[serial]
fn test_enrich_missing_file_fails() {
  let dir = tempdir().unwrap();
  texmine(&dir)
    .arg("enrich")
    .arg(dir.path().join("missing.json"))
    .assert()
    .failure()
    .stderr(predicate::str::contains("Could not load papers"));
}
