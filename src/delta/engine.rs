//! Reconciles scanner, enumerator, and manifest observations into a report.

use tracing::debug;

use crate::delta::{DiffReport, ManifestDetails};
use crate::error::{DeltaError, Result};
use crate::manifest::{ComponentManifest, ProjectManifestText};
use crate::model::{Alteration, AlteredFileSet, CurrentFileSet};

/// Compute the change report for one component.
///
/// Current paths the scanner marks `Added` are added, other altered current
/// paths are modified, and altered paths missing from the listing are
/// removed. Renames surface as one removed and one added entry. Project
/// manifest details are attached only when the scanner flags the manifest as
/// changed, as the parsed object or the unparseable marker.
///
/// Same inputs always produce the same report.
///
/// # Errors
///
/// Returns [`DeltaError::InvalidManifest`] if the manifest name is blank.
pub fn compute_diff(
    manifest: &ComponentManifest,
    altered: &AlteredFileSet,
    current: &CurrentFileSet,
    project_manifest: &ProjectManifestText,
) -> Result<DiffReport> {
    if manifest.name().trim().is_empty() {
        return Err(DeltaError::InvalidManifest("component name is empty".into()));
    }

    let mut added = Vec::new();
    let mut modified = Vec::new();
    for path in &current.paths {
        match altered.alteration(path) {
            Some(Alteration::Added) => added.push(path.clone()),
            Some(Alteration::Modified | Alteration::Deleted) => modified.push(path.clone()),
            None => {}
        }
    }
    let mut removed: Vec<String> =
        altered.paths().filter(|p| !current.contains(p)).map(str::to_string).collect();

    added.sort();
    modified.sort();
    removed.sort();

    let manifest_changed = altered.is_specific_changed(&project_manifest.path);
    let manifest_details = manifest_changed.then(|| match project_manifest.parse() {
        Ok(map) => ManifestDetails::Parsed(map),
        Err(err) => {
            debug!(error = %err, "project manifest unparseable");
            ManifestDetails::Unparseable
        }
    });

    debug!(
        component = manifest.name(),
        added = added.len(),
        modified = modified.len(),
        removed = removed.len(),
        manifest_changed,
        "computed diff"
    );

    Ok(DiffReport {
        component_name: manifest.name().to_string(),
        added,
        modified,
        removed,
        manifest_changed,
        manifest_details,
        uses_source_dir: manifest.uses_source_dir(),
    })
}
