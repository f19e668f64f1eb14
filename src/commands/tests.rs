use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use smpte_validate::validate::TableBodyRule;

use super::check::count_failed;
use super::metadata::read_metadata;
use super::suite::{Expectation, discover_documents};
use super::*;
use crate::cli::{CheckArgs, MetadataArgs, SuiteArgs};

fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures").join("validation")
}

fn fixture(name: &str) -> PathBuf {
    fixtures_dir().join(name)
}

fn read_json(path: &Path) -> Value {
    let raw = fs::read(path).expect("report should be written");
    serde_json::from_slice(&raw).expect("report should be valid json")
}

const GUIDELINE: &str = r#"<!DOCTYPE html>
<html>
  <head itemscope="itemscope" itemtype="http://smpte.org/standards/documents">
    <title>Widget Handling</title>
    <meta itemprop="test" content="valid">
    <meta itemprop="pubType" content="AG">
    <meta itemprop="pubState" content="draft">
  </head>
  <body>
    <section id="sec-scope"><h2>Scope</h2><p>Widgets.</p></section>
  </body>
</html>"#;

#[test]
fn parse_flag_accepts_common_truthy_values() {
    for value in ["1", "true", "TRUE", " yes ", "on"] {
        assert!(parse_flag(value), "{value} should enable the flag");
    }
    for value in ["0", "false", "", "legacy"] {
        assert!(!parse_flag(value), "{value} should not enable the flag");
    }
}

#[test]
fn validation_options_follow_flags() {
    let structure_only = validation_options(&ValidationFlags {
        legacy_tables: false,
        structure_only: true,
    });
    assert!(!structure_only.document_rules);

    let full = validation_options(&ValidationFlags::default());
    assert!(full.document_rules);

    let legacy = validation_options(&ValidationFlags {
        legacy_tables: true,
        structure_only: false,
    });
    assert_eq!(legacy.table_bodies, TableBodyRule::ZeroOrMore);
}

#[test]
fn build_report_distinguishes_pass_failure_and_fatal() {
    let options = ValidationOptions::full();
    let path = Path::new("widget.html");

    let passing = Document::parse_html(GUIDELINE);
    let report = build_report(path, "00".to_string(), &passing, &options);
    assert_eq!(report.status, ReportStatus::Pass);
    assert!(report.passed());
    assert_eq!(report.report_version, REPORT_VERSION);
    assert!(report.metadata.is_some());

    let failing = Document::parse_html(&GUIDELINE.replace("sec-scope", "sec-widgets"));
    let report = build_report(path, "00".to_string(), &failing, &options);
    assert_eq!(report.status, ReportStatus::Failed);
    assert!(!report.diagnostics.is_empty());
    assert!(report.metadata.is_some());

    let fatal = Document::parse_html(&GUIDELINE.replace(r#"content="AG""#, r#"content="XX""#));
    let report = build_report(path, "00".to_string(), &fatal, &options);
    assert_eq!(report.status, ReportStatus::Fatal);
    assert_eq!(report.fatal.as_deref(), Some("pubType invalid"));
    assert!(report.metadata.is_none());
    assert_eq!(report.diagnostics.len(), 1);
    assert_eq!(count_failed(std::slice::from_ref(&report)), 1);
}

#[test]
fn check_writes_single_report_for_one_file() {
    let temp = tempfile::tempdir().expect("tempdir should be created");
    let report_path = temp.path().join("reports").join("check.json");

    check::run(CheckArgs {
        files: vec![fixture("valid-published-standard.html")],
        report_path: Some(report_path.clone()),
        flags: ValidationFlags::default(),
    })
    .expect("valid fixture should pass");

    let report = read_json(&report_path);
    assert_eq!(report["status"], "pass");
    assert_eq!(report["metadata"]["pubType"], "ST");
    assert_eq!(report["metadata"]["pubTC"], "35PM");
    assert_eq!(
        report["source_sha256"].as_str().map(str::len),
        Some(64)
    );
}

#[test]
fn check_fails_and_reports_every_file() {
    let temp = tempfile::tempdir().expect("tempdir should be created");
    let report_path = temp.path().join("check.json");

    let result = check::run(CheckArgs {
        files: vec![
            fixture("valid-minimal-guideline.html"),
            fixture("invalid-reference-list.html"),
        ],
        report_path: Some(report_path.clone()),
        flags: ValidationFlags::default(),
    });
    assert!(result.is_err());

    let report = read_json(&report_path);
    let entries = report.as_array().expect("report should be an array");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["status"], "pass");
    assert_eq!(entries[1]["status"], "failed");
    assert_eq!(
        entries[1]["diagnostics"]
            .as_array()
            .map(Vec::len),
        Some(2)
    );
}

#[test]
fn check_reports_unreadable_file_and_continues() {
    let temp = tempfile::tempdir().expect("tempdir should be created");
    let report_path = temp.path().join("check.json");

    let result = check::run(CheckArgs {
        files: vec![
            temp.path().join("absent.html"),
            fixture("valid-minimal-guideline.html"),
        ],
        report_path: Some(report_path.clone()),
        flags: ValidationFlags::default(),
    });

    let err = result.expect_err("missing file should fail the run");
    assert!(err.to_string().contains("1 of 2 documents"));

    let report = read_json(&report_path);
    let entries = report.as_array().expect("report should be an array");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["status"], "fatal");
    assert!(
        entries[0]["fatal"]
            .as_str()
            .is_some_and(|fatal| fatal.contains("failed to read"))
    );
    assert!(entries[0]["metadata"].is_null());
    assert_eq!(entries[1]["status"], "pass");
}

#[test]
fn metadata_writes_wire_field_names() {
    let temp = tempfile::tempdir().expect("tempdir should be created");
    let output = temp.path().join("metadata.json");

    metadata::run(MetadataArgs {
        file: fixture("valid-published-standard.html"),
        output: Some(output.clone()),
    })
    .expect("metadata should be readable");

    let metadata = read_json(&output);
    assert_eq!(metadata["pubTitle"], "Widget Interchange Format");
    assert_eq!(metadata["pubState"], "pub");
    assert_eq!(metadata["pubStage"], "PUB");
    assert_eq!(metadata["pubNumber"], "4242");
    assert_eq!(metadata["pubConfidential"], false);
}

#[test]
fn metadata_surfaces_fatal_error() {
    let document = Document::parse_html(&GUIDELINE.replace("<title>Widget Handling</title>", ""));

    let err = read_metadata(&document).expect_err("missing title should be fatal");

    assert!(err.to_string().contains("pubTitle invalid"));
}

#[test]
fn suite_meets_fixture_expectations() {
    suite::run(SuiteArgs {
        dir: fixtures_dir(),
        flags: ValidationFlags::default(),
    })
    .expect("every fixture should meet its expectation");
}

#[test]
fn suite_reports_unmet_expectation() {
    let temp = tempfile::tempdir().expect("tempdir should be created");
    let mislabelled = GUIDELINE.replace(r#"content="valid""#, r#"content="invalid""#);
    fs::write(temp.path().join("mislabelled.html"), mislabelled).expect("fixture should be written");
    fs::write(temp.path().join("notes.txt"), "not a document").expect("notes should be written");

    let result = suite::run(SuiteArgs {
        dir: temp.path().to_path_buf(),
        flags: ValidationFlags::default(),
    });

    let err = result.expect_err("mislabelled document should fail the suite");
    assert!(err.to_string().contains("1 of 1 documents"));
}

#[test]
fn suite_requires_documents() {
    let temp = tempfile::tempdir().expect("tempdir should be created");

    let result = suite::run(SuiteArgs {
        dir: temp.path().to_path_buf(),
        flags: ValidationFlags::default(),
    });

    assert!(result.is_err());
}

#[test]
fn expectation_reads_test_field() {
    let valid = Document::parse_html(GUIDELINE);
    assert_eq!(Expectation::of(&valid), Some(Expectation::Valid));

    let invalid = Document::parse_html(&GUIDELINE.replace(r#"content="valid""#, r#"content="invalid""#));
    assert_eq!(Expectation::of(&invalid), Some(Expectation::Invalid));

    let undeclared = Document::parse_html(&GUIDELINE.replace(r#"itemprop="test""#, ""));
    assert_eq!(Expectation::of(&undeclared), None);
}

#[test]
fn discover_documents_lists_html_files_in_order() {
    let documents = discover_documents(&fixtures_dir()).expect("fixtures should be listed");

    assert!(documents.len() >= 8);
    assert!(documents.windows(2).all(|pair| pair[0] < pair[1]));
    assert!(
        documents
            .iter()
            .all(|path| path.extension().and_then(|ext| ext.to_str()) == Some("html"))
    );
}
