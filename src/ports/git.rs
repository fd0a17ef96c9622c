//! Git repository port for version-control queries.

use std::path::Path;

use crate::model::FileChange;

/// Provides the version-control operations the pipeline needs.
///
/// Abstracting git access allows deterministic replay and testing
/// without requiring a real repository.
pub trait GitRepo: Send + Sync {
    /// Resolves `reference` to a commit hash from within `root`.
    ///
    /// Returns `Ok(None)` when `root` is not under version control or the
    /// reference cannot be resolved (for example, no commit exists yet).
    ///
    /// # Errors
    ///
    /// Returns an error if the version-control tooling cannot be run.
    fn resolve_reference(
        &self,
        root: &Path,
        reference: &str,
    ) -> Result<Option<String>, Box<dyn std::error::Error + Send + Sync>>;

    /// Lists files altered under `root` since `reference`, including
    /// untracked files (marked as added). Paths are relative to `root`.
    ///
    /// # Errors
    ///
    /// Returns an error if the change list cannot be computed.
    fn changed_files(
        &self,
        root: &Path,
        reference: &str,
    ) -> Result<Vec<FileChange>, Box<dyn std::error::Error + Send + Sync>>;

    /// Creates a fresh repository at `root` and commits everything in it.
    ///
    /// # Errors
    ///
    /// Returns an error if any step of the initialization fails.
    fn reinitialize(
        &self,
        root: &Path,
        message: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}
