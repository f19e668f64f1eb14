//! Conditions that abort a validation run before the body is examined.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FatalError {
    #[error("pubTitle invalid: the document title is missing")]
    MissingTitle,

    #[error("pubType invalid")]
    InvalidPubType { value: Option<String> },

    #[error("pubState invalid")]
    InvalidPubState { value: Option<String> },

    #[error("pubDateTime must be present for pub state")]
    MissingPubDateTime,

    #[error("Published OM requires effectiveDateTime")]
    MissingEffectiveDateTime,

    #[error("pubStage invalid")]
    InvalidPubStage { value: Option<String> },

    #[error("pubTC invalid")]
    InvalidPubTc,

    #[error("pubVersion must be present for a published {pub_type} document")]
    MissingPubVersion { pub_type: String },

    #[error("pubConfidential can only be false at the CD or PUB stage")]
    ConfidentialityStage { stage: Option<String> },
}
