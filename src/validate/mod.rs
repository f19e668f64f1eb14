//! Conformance checks for SMPTE HTML publications.
//!
//! [`validate`] reads the head metadata first; a fatal metadata problem ends
//! the run there. Otherwise the body is matched against the document grammar
//! and every finding is accumulated in the caller's [`Diagnostics`].

use std::collections::BTreeSet;
use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use tracing::debug;

use crate::diagnostics::Diagnostics;
use crate::dom::{Document, Node};
use crate::error::FatalError;
use crate::model::{DocumentMetadata, PubStage, PubState, PubType};

mod body;
mod content;
mod grammar;
mod metadata;
mod rules;
mod sections;

pub use self::body::{body_grammar, validate_body};
pub use self::content::ContentModel;
pub use self::grammar::{Cursor, GrammarRule, NodeCheck, NodeGuard};
pub use self::metadata::{HEAD_ITEMSCOPE, HEAD_ITEMTYPE, head_field, is_partial_iso_date, validate_head};
pub use self::rules::check_document_rules;

use self::content::*;
use self::sections::*;

pub const LEGACY_TABLES_ENV: &str = "SMPTE_VALIDATE_LEGACY_TABLES";

/// How many `tbody` elements a table needs.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum TableBodyRule {
    #[default]
    OneOrMore,
    /// Older documents were allowed tables without a body.
    ZeroOrMore,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ValidationOptions {
    pub table_bodies: TableBodyRule,
    pub document_rules: bool,
}

impl ValidationOptions {
    /// Metadata and structure only.
    pub fn core() -> Self {
        Self::default()
    }

    /// Structure plus the publication-type and cross-reference rules.
    pub fn full() -> Self {
        Self {
            document_rules: true,
            ..Self::default()
        }
    }

    pub fn with_legacy_tables(mut self, legacy: bool) -> Self {
        if legacy {
            self.table_bodies = TableBodyRule::ZeroOrMore;
        }
        self
    }
}

pub fn validate(
    document: &Document,
    diagnostics: &mut Diagnostics,
) -> Result<DocumentMetadata, FatalError> {
    validate_with(document, diagnostics, &ValidationOptions::core())
}

pub fn validate_with(
    document: &Document,
    diagnostics: &mut Diagnostics,
    options: &ValidationOptions,
) -> Result<DocumentMetadata, FatalError> {
    let metadata = validate_head(&document.head, document.title.as_deref(), diagnostics)?;
    debug!(
        pub_type = metadata.pub_type.as_str(),
        pub_number = metadata.pub_number.as_deref().unwrap_or_default(),
        "metadata accepted"
    );

    validate_body(&document.body, diagnostics, options);

    if options.document_rules {
        check_document_rules(document, &metadata, diagnostics);
    }

    debug!(
        errors = diagnostics.error_list().len(),
        failed = diagnostics.has_failed(),
        "validation finished"
    );

    Ok(metadata)
}
