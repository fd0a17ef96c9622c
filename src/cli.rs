//! CLI argument definitions.

use std::path::PathBuf;

use clap::Parser;

use crate::delta::report::ReportFormat;

/// Top-level CLI parser for `pkgdelta`.
#[derive(Debug, Parser)]
#[command(
    name = "pkgdelta",
    version,
    about = "Report what changed in a component since its last recorded snapshot"
)]
pub struct Cli {
    /// Component name to report instead of the declared one.
    #[arg(short, long)]
    pub name: Option<String>,

    /// Reset version-control history, seed a .gitignore, and commit everything.
    #[arg(long)]
    pub init: bool,

    /// Component root directory (defaults to the current directory).
    #[arg(short = 'C', long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Reference point to compare against.
    #[arg(short, long, value_name = "REF", default_value = "HEAD")]
    pub base: String,

    /// Project manifest file whose changes are reported in detail.
    #[arg(long, value_name = "FILE", default_value = "package.json")]
    pub project_manifest: String,

    /// Additional file to flag when changed (repeatable).
    #[arg(long = "track", value_name = "FILE")]
    pub track: Vec<String>,

    /// Additional ignore pattern for the file listing (repeatable).
    #[arg(long = "ignore", value_name = "PATTERN")]
    pub ignore: Vec<String>,

    /// Output format of the report.
    #[arg(long, value_enum, default_value_t = ReportFormat::Json)]
    pub format: ReportFormat,

    /// Log every pipeline stage to stderr.
    #[arg(short, long)]
    pub verbose: bool,
}
