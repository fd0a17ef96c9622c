//! Change scanner: what is altered under a root since a reference point.

use std::path::Path;

use tracing::debug;

use crate::context::ServiceContext;
use crate::error::{DeltaError, Result};
use crate::model::AlteredFileSet;

/// Scan `root` for files altered since `reference`, flagging each of the
/// `tracked` file names that changed.
///
/// Idempotent for a fixed reference point and working tree.
///
/// # Errors
///
/// - [`DeltaError::ScanUnavailable`] when `root` is not under version control
///   or `reference` does not resolve.
/// - [`DeltaError::Collaborator`] when the version-control tooling fails.
pub fn scan_altered(
    ctx: &ServiceContext,
    root: &Path,
    reference: &str,
    tracked: &[String],
) -> Result<AlteredFileSet> {
    let resolved = ctx
        .git
        .resolve_reference(root, reference)
        .map_err(|e| DeltaError::collaborator("scan", e))?;
    let Some(commit) = resolved else {
        return Err(DeltaError::ScanUnavailable(format!(
            "cannot resolve {reference:?} in {}",
            root.display()
        )));
    };

    let changes =
        ctx.git.changed_files(root, reference).map_err(|e| DeltaError::collaborator("scan", e))?;
    debug!(%commit, reference, changes = changes.len(), "scanned altered files");

    Ok(AlteredFileSet::from_changes(changes, tracked))
}
