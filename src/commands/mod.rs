pub mod check;
pub mod metadata;
pub mod suite;

#[cfg(test)]
mod tests;

use std::env;
use std::path::Path;

use anyhow::Result;
use tracing::warn;

use smpte_validate::diagnostics::Diagnostics;
use smpte_validate::dom::Document;
use smpte_validate::model::{REPORT_VERSION, ReportStatus, ValidationReport};
use smpte_validate::util::{now_utc_string, read_document_source};
use smpte_validate::validate::{LEGACY_TABLES_ENV, ValidationOptions, validate_with};

use crate::cli::ValidationFlags;

pub(crate) fn validation_options(flags: &ValidationFlags) -> ValidationOptions {
    let base = if flags.structure_only {
        ValidationOptions::core()
    } else {
        ValidationOptions::full()
    };

    base.with_legacy_tables(flags.legacy_tables || env_flag(LEGACY_TABLES_ENV))
}

pub(crate) fn env_flag(name: &str) -> bool {
    env::var(name)
        .map(|value| parse_flag(&value))
        .unwrap_or(false)
}

pub(crate) fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

pub(crate) fn load_document(path: &Path) -> Result<(Document, String)> {
    let (source, digest) = read_document_source(path)?;
    Ok((Document::parse_html(&source), digest))
}

pub(crate) fn build_report(
    source_path: &Path,
    source_sha256: String,
    document: &Document,
    options: &ValidationOptions,
) -> ValidationReport {
    let mut diagnostics = Diagnostics::new();
    let outcome = validate_with(document, &mut diagnostics, options);

    let (status, fatal, metadata) = match outcome {
        Ok(metadata) if diagnostics.has_failed() => (ReportStatus::Failed, None, Some(metadata)),
        Ok(metadata) => (ReportStatus::Pass, None, Some(metadata)),
        Err(err) => (ReportStatus::Fatal, Some(err.to_string()), None),
    };

    ValidationReport {
        report_version: REPORT_VERSION,
        generated_at: now_utc_string(),
        source_path: source_path.display().to_string(),
        source_sha256,
        status,
        fatal,
        metadata,
        diagnostics: diagnostics.into_errors(),
    }
}

/// Report for a file that could not be read or decoded. It counts as fatal.
pub(crate) fn unreadable_report(source_path: &Path, err: &anyhow::Error) -> ValidationReport {
    ValidationReport {
        report_version: REPORT_VERSION,
        generated_at: now_utc_string(),
        source_path: source_path.display().to_string(),
        source_sha256: String::new(),
        status: ReportStatus::Fatal,
        fatal: Some(format!("{err:#}")),
        metadata: None,
        diagnostics: Vec::new(),
    }
}

pub(crate) fn log_diagnostics(report: &ValidationReport) {
    for diagnostic in &report.diagnostics {
        let node = diagnostic
            .node
            .as_ref()
            .map(|node| node.id.clone().unwrap_or_else(|| node.tag.clone()))
            .unwrap_or_default();
        warn!(
            path = %report.source_path,
            node = %node,
            "{}",
            diagnostic.message
        );
    }
}
