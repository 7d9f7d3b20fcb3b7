use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "pdf-toc",
    version,
    about = "Table of contents extraction from layout-analysis title candidates"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Extract(ExtractArgs),
    Features(FeaturesArgs),
}

#[derive(Args, Debug, Clone)]
pub struct SegmentSourceArgs {
    /// Tokenized document JSON produced by the document-features extractor.
    #[arg(long)]
    pub document: PathBuf,

    /// Candidate boxes JSON; takes precedence over the layout backend.
    #[arg(long)]
    pub segments: Option<PathBuf>,

    #[arg(long, required_unless_present = "segments")]
    pub pdf: Option<PathBuf>,

    #[arg(long, env = "PDF_TOC_LAYOUT_URL")]
    pub layout_url: Option<String>,

    #[arg(long, default_value_t = false)]
    pub fast: bool,

    #[arg(long)]
    pub layout_timeout_secs: Option<u64>,
}

#[derive(Args, Debug, Clone)]
pub struct ExtractArgs {
    #[command(flatten)]
    pub source: SegmentSourceArgs,

    #[arg(long)]
    pub output: Option<PathBuf>,

    #[arg(long)]
    pub manifest_path: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct FeaturesArgs {
    #[command(flatten)]
    pub source: SegmentSourceArgs,

    #[arg(long, default_value_t = false)]
    pub before_merge: bool,

    #[arg(long)]
    pub output: Option<PathBuf>,
}
