use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "smpte-validate",
    version,
    about = "Structural and metadata validation for SMPTE HTML publications"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate one or more documents.
    Check(CheckArgs),
    /// Print the publication metadata of a document.
    Metadata(MetadataArgs),
    /// Run a directory of documents against their declared expectations.
    Suite(SuiteArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct ValidationFlags {
    /// Accept tables without a tbody element.
    #[arg(long, default_value_t = false)]
    pub legacy_tables: bool,

    /// Skip the publication-type and cross-reference rules.
    #[arg(long, default_value_t = false)]
    pub structure_only: bool,
}

#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    #[arg(long)]
    pub report_path: Option<PathBuf>,

    #[command(flatten)]
    pub flags: ValidationFlags,
}

#[derive(Args, Debug, Clone)]
pub struct MetadataArgs {
    pub file: PathBuf,

    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct SuiteArgs {
    pub dir: PathBuf,

    #[command(flatten)]
    pub flags: ValidationFlags,
}
