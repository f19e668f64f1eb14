use serde::Serialize;

use crate::diagnostics::Diagnostic;

pub const REPORT_VERSION: u32 = 1;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
pub enum PubType {
    #[serde(rename = "AG")]
    Ag,
    #[serde(rename = "OM")]
    Om,
    #[serde(rename = "ST")]
    St,
    #[serde(rename = "RP")]
    Rp,
    #[serde(rename = "EG")]
    Eg,
    #[serde(rename = "ER")]
    Er,
    #[serde(rename = "RDD")]
    Rdd,
}

impl PubType {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "AG" => Some(Self::Ag),
            "OM" => Some(Self::Om),
            "ST" => Some(Self::St),
            "RP" => Some(Self::Rp),
            "EG" => Some(Self::Eg),
            "ER" => Some(Self::Er),
            "RDD" => Some(Self::Rdd),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ag => "AG",
            Self::Om => "OM",
            Self::St => "ST",
            Self::Rp => "RP",
            Self::Eg => "EG",
            Self::Er => "ER",
            Self::Rdd => "RDD",
        }
    }

    /// Engineering documents carry a stage and a technology committee.
    pub fn is_engineering_document(self) -> bool {
        matches!(
            self,
            Self::St | Self::Rp | Self::Eg | Self::Er | Self::Rdd
        )
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PubState {
    Draft,
    Pub,
}

impl PubState {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "draft" => Some(Self::Draft),
            "pub" => Some(Self::Pub),
            _ => None,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PubStage {
    Wd,
    Cd,
    Fcd,
    Dp,
    Pub,
}

impl PubStage {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "WD" => Some(Self::Wd),
            "CD" => Some(Self::Cd),
            "FCD" => Some(Self::Fcd),
            "DP" => Some(Self::Dp),
            "PUB" => Some(Self::Pub),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Wd => "WD",
            Self::Cd => "CD",
            Self::Fcd => "FCD",
            Self::Dp => "DP",
            Self::Pub => "PUB",
        }
    }
}

/// Publication identity read from the document head. Built once per run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetadata {
    pub pub_title: String,
    pub pub_type: PubType,
    pub pub_state: PubState,
    pub pub_stage: Option<PubStage>,
    pub pub_number: Option<String>,
    pub pub_part: Option<String>,
    pub pub_version: Option<String>,
    pub pub_suite_title: Option<String>,
    #[serde(rename = "pubTC")]
    pub pub_tc: Option<String>,
    pub pub_confidential: Option<bool>,
    pub pub_date_time: Option<String>,
    pub effective_date_time: Option<String>,
    pub pub_revision_of: Option<String>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Pass,
    Failed,
    Fatal,
}

impl ReportStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Failed => "failed",
            Self::Fatal => "fatal",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub report_version: u32,
    pub generated_at: String,
    pub source_path: String,
    pub source_sha256: String,
    pub status: ReportStatus,
    pub fatal: Option<String>,
    pub metadata: Option<DocumentMetadata>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ValidationReport {
    pub fn passed(&self) -> bool {
        self.status == ReportStatus::Pass
    }
}
