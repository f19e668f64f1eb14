use std::io::{self, Write};

use anyhow::{Context, Result};
use tracing::{info, warn};

use smpte_validate::diagnostics::Diagnostics;
use smpte_validate::dom::Document;
use smpte_validate::model::DocumentMetadata;
use smpte_validate::util::write_json_pretty;
use smpte_validate::validate::validate_head;

use crate::cli::MetadataArgs;

use super::load_document;

pub fn run(args: MetadataArgs) -> Result<()> {
    let (document, _) = load_document(&args.file)?;
    let metadata = read_metadata(&document)
        .with_context(|| format!("failed to read metadata from {}", args.file.display()))?;

    match &args.output {
        Some(output) => {
            write_json_pretty(output, &metadata)?;
            info!(path = %output.display(), "wrote document metadata");
        }
        None => {
            let data = serde_json::to_string_pretty(&metadata)
                .context("failed to serialize document metadata")?;
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{data}").context("failed to write document metadata")?;
        }
    }

    Ok(())
}

/// Head-only validation. Recoverable findings are logged; a fatal one is the
/// error.
pub(crate) fn read_metadata(document: &Document) -> Result<DocumentMetadata> {
    let mut diagnostics = Diagnostics::new();
    let outcome = validate_head(&document.head, document.title.as_deref(), &mut diagnostics);

    for diagnostic in diagnostics.error_list() {
        warn!("{}", diagnostic.message);
    }

    Ok(outcome?)
}
