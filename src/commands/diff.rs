//! Default mode: gather observations, reconcile them, and emit the report.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::cli::Cli;
use crate::context::ServiceContext;
use crate::delta::engine::compute_diff;
use crate::delta::report::{render, ReportFormat};
use crate::delta::DiffReport;
use crate::error::{DeltaError, Result};
use crate::files::enumerate;
use crate::manifest::reader::{default_manifest, has_source_dir, read_manifest};
use crate::manifest::{ComponentManifest, ProjectManifestText};
use crate::model::{normalize_path, AlteredFileSet};
use crate::scan::scan_altered;

/// Inputs of one report invocation.
#[derive(Debug, Clone)]
pub struct DiffOptions {
    /// Component root.
    pub root: PathBuf,
    /// Reference point to compare against.
    pub reference: String,
    /// Name override for the component.
    pub name: Option<String>,
    /// Root-relative path of the project manifest.
    pub project_manifest: String,
    /// Extra tracked files flagged when changed.
    pub track: Vec<String>,
    /// Extra ignore patterns for the file listing.
    pub ignore: Vec<String>,
    /// Output format.
    pub format: ReportFormat,
}

impl DiffOptions {
    /// Options with defaults for `root`: `HEAD`, `package.json`, JSON output.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            reference: "HEAD".to_string(),
            name: None,
            project_manifest: "package.json".to_string(),
            track: Vec::new(),
            ignore: Vec::new(),
            format: ReportFormat::Json,
        }
    }

    /// Options taken from parsed CLI arguments for an already-resolved root.
    #[must_use]
    pub fn from_cli(cli: &Cli, root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            reference: cli.base.clone(),
            name: cli.name.clone(),
            project_manifest: cli.project_manifest.clone(),
            track: cli.track.clone(),
            ignore: cli.ignore.clone(),
            format: cli.format,
        }
    }

    /// The project manifest followed by extra tracked files, normalized and
    /// without duplicates.
    #[must_use]
    pub fn tracked_files(&self) -> Vec<String> {
        let mut tracked: Vec<String> = Vec::with_capacity(self.track.len() + 1);
        for name in std::iter::once(&self.project_manifest).chain(&self.track) {
            let name = normalize_path(name);
            if !name.is_empty() && !tracked.contains(&name) {
                tracked.push(name);
            }
        }
        tracked
    }
}

/// Execute the default mode and print the report to stdout.
///
/// # Errors
///
/// Returns an error string if the report cannot be produced or rendered.
pub fn run(ctx: &ServiceContext, options: &DiffOptions) -> std::result::Result<(), String> {
    let report = build_report(ctx, options).map_err(|e| e.to_string())?;
    let rendered = render(&report, options.format).map_err(|e| e.to_string())?;
    println!("{rendered}");
    Ok(())
}

/// Gather every observation and compute the report.
///
/// A missing component manifest falls back to a default one, an
/// unresolvable reference point reports every file as added, and a missing
/// project manifest reads as empty text. Ignore rules apply to altered paths
/// as well as to the listing, so an ignored file is never reported.
///
/// # Errors
///
/// Returns [`DeltaError::InvalidManifest`] for a blank component name and
/// [`DeltaError::Collaborator`] when a collaborator fails outright.
pub fn build_report(ctx: &ServiceContext, options: &DiffOptions) -> Result<DiffReport> {
    let root = options.root.as_path();
    let manifest = load_manifest(ctx, root, options.name.as_deref())?;
    let tracked = options.tracked_files();

    let scanned = match scan_altered(ctx, root, &options.reference, &tracked) {
        Ok(altered) => Some(altered),
        Err(err) if err.is_recoverable() => {
            info!(reason = %err, "no prior snapshot, reporting every file as added");
            None
        }
        Err(err) => return Err(err),
    };
    let listing = enumerate(ctx, root, &options.ignore)?;
    let altered = match scanned {
        Some(mut altered) => {
            altered.retain(|path| !listing.rules.is_ignored(path));
            altered
        }
        None => AlteredFileSet::without_history(&listing.current, &tracked),
    };
    let project_manifest = read_project_manifest(ctx, root, &options.project_manifest);

    compute_diff(&manifest, &altered, &listing.current, &project_manifest)
}

/// Read the component manifest, substituting a default when it is missing,
/// then apply the name override.
///
/// # Errors
///
/// Returns [`DeltaError::InvalidManifest`] if the resulting name is blank or
/// the manifest file is malformed.
pub fn load_manifest(
    ctx: &ServiceContext,
    root: &Path,
    name_override: Option<&str>,
) -> Result<ComponentManifest> {
    match read_manifest(ctx, root) {
        Ok(manifest) => match name_override {
            Some(name) => manifest.with_name(name),
            None => Ok(manifest),
        },
        Err(DeltaError::ManifestMissing(path)) => {
            debug!(path = %path.display(), "no component manifest, using defaults");
            match name_override {
                Some(name) => {
                    ComponentManifest::new(name, has_source_dir(ctx, root), BTreeMap::new())
                }
                None => default_manifest(ctx, root),
            }
        }
        Err(err) => Err(err),
    }
}

/// Read the raw project manifest; an unreadable file yields empty text.
#[must_use]
pub fn read_project_manifest(
    ctx: &ServiceContext,
    root: &Path,
    path: &str,
) -> ProjectManifestText {
    let raw = match ctx.fs.read_to_string(&root.join(normalize_path(path))) {
        Ok(raw) => raw,
        Err(err) => {
            debug!(path, error = %err, "project manifest unreadable, treating as empty");
            String::new()
        }
    };
    ProjectManifestText::new(path, raw)
}
