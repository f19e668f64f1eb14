use anyhow::{Result, bail};
use tracing::{info, warn};

use smpte_validate::model::{ReportStatus, ValidationReport};
use smpte_validate::util::write_json_pretty;
use smpte_validate::validate::TableBodyRule;

use crate::cli::CheckArgs;

use super::{build_report, load_document, log_diagnostics, unreadable_report, validation_options};

pub fn run(args: CheckArgs) -> Result<()> {
    let options = validation_options(&args.flags);
    let legacy_tables = options.table_bodies == TableBodyRule::ZeroOrMore;
    info!(
        files = args.files.len(),
        legacy_tables,
        document_rules = options.document_rules,
        "validation started"
    );

    let mut reports = Vec::with_capacity(args.files.len());
    for path in &args.files {
        let report = match load_document(path) {
            Ok((document, digest)) => build_report(path, digest, &document, &options),
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %format!("{err:#}"),
                    "document could not be read"
                );
                reports.push(unreadable_report(path, &err));
                continue;
            }
        };

        log_diagnostics(&report);
        match report.status {
            ReportStatus::Pass => info!(path = %path.display(), "document passed"),
            ReportStatus::Failed => warn!(
                path = %path.display(),
                errors = report.diagnostics.len(),
                "document failed validation"
            ),
            ReportStatus::Fatal => warn!(
                path = %path.display(),
                fatal = %report.fatal.as_deref().unwrap_or_default(),
                "document metadata is unusable"
            ),
        }

        reports.push(report);
    }

    if let Some(report_path) = &args.report_path {
        match reports.as_slice() {
            [single] => write_json_pretty(report_path, single)?,
            _ => write_json_pretty(report_path, &reports)?,
        }
        info!(path = %report_path.display(), "wrote validation report");
    }

    let failed = count_failed(&reports);
    info!(
        documents = reports.len(),
        failed,
        "validation completed"
    );

    if failed > 0 {
        bail!("{failed} of {} documents failed validation", reports.len());
    }

    Ok(())
}

pub(crate) fn count_failed(reports: &[ValidationReport]) -> usize {
    reports.iter().filter(|report| !report.passed()).count()
}
