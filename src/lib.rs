//! Validation of SMPTE standards documents authored as semantic HTML.
//!
//! A [`Document`] is checked in two tiers: publication metadata from the head,
//! where a violation can be fatal, then the body grammar, whose findings are
//! all recoverable and collected in a [`Diagnostics`] sink.

pub mod diagnostics;
pub mod dom;
pub mod error;
pub mod model;
pub mod util;
pub mod validate;

pub use crate::diagnostics::{Diagnostic, Diagnostics, NodeRef};
pub use crate::dom::{Document, Node};
pub use crate::error::FatalError;
pub use crate::model::{DocumentMetadata, PubStage, PubState, PubType};
pub use crate::validate::{TableBodyRule, ValidationOptions, validate, validate_with};
