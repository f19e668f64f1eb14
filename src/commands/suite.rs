use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::{info, warn};

use smpte_validate::dom::Document;
use smpte_validate::model::ValidationReport;

use crate::cli::SuiteArgs;

use super::{build_report, load_document, log_diagnostics, validation_options};

const EXPECTATION_FIELD: &str = "test";

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum Expectation {
    Valid,
    Invalid,
}

impl Expectation {
    /// Reads the `test` field of the head. Anything but `valid` expects a
    /// failure.
    pub(crate) fn of(document: &Document) -> Option<Self> {
        let value = document
            .head
            .descendants()
            .find(|node| node.is("meta") && node.attr("itemprop") == Some(EXPECTATION_FIELD))?
            .attr("content")
            .unwrap_or_default();

        Some(if value == "valid" {
            Self::Valid
        } else {
            Self::Invalid
        })
    }

    pub(crate) fn is_met_by(self, report: &ValidationReport) -> bool {
        match self {
            Self::Valid => report.passed(),
            Self::Invalid => !report.passed(),
        }
    }
}

pub fn run(args: SuiteArgs) -> Result<()> {
    let options = validation_options(&args.flags);
    let paths = discover_documents(&args.dir)?;
    if paths.is_empty() {
        bail!("no HTML documents found in {}", args.dir.display());
    }

    let mut unmet = Vec::new();
    for path in &paths {
        let (document, digest) = load_document(path)?;
        let Some(expectation) = Expectation::of(&document) else {
            warn!(path = %path.display(), "document declares no test expectation");
            unmet.push(path.clone());
            continue;
        };

        let report = build_report(path, digest, &document, &options);
        if expectation.is_met_by(&report) {
            info!(path = %path.display(), expected = ?expectation, "expectation met");
            continue;
        }

        warn!(
            path = %path.display(),
            expected = ?expectation,
            status = report.status.as_str(),
            "expectation not met"
        );
        log_diagnostics(&report);
        unmet.push(path.clone());
    }

    info!(
        documents = paths.len(),
        unmet = unmet.len(),
        "suite completed"
    );

    if !unmet.is_empty() {
        bail!(
            "{} of {} documents did not meet their expectation",
            unmet.len(),
            paths.len()
        );
    }

    Ok(())
}

pub(crate) fn discover_documents(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut documents = Vec::new();

    let entries = fs::read_dir(dir).with_context(|| format!("failed to read {}", dir.display()))?;
    for entry in entries {
        let entry = entry.with_context(|| format!("failed to read entry in {}", dir.display()))?;
        let path = entry.path();

        if !entry
            .file_type()
            .with_context(|| format!("failed to inspect file type: {}", path.display()))?
            .is_file()
        {
            continue;
        }

        let is_html = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("html"))
            .unwrap_or(false);

        if is_html {
            documents.push(path);
        }
    }

    documents.sort();
    Ok(documents)
}
