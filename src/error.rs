//! Error taxonomy for the change-report pipeline.
//!
//! Only [`DeltaError::InvalidManifest`] and [`DeltaError::Collaborator`] end an
//! invocation. The remaining kinds are raised by the collaborators and
//! absorbed by the pipeline with a fallback value.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using [`DeltaError`].
pub type Result<T> = std::result::Result<T, DeltaError>;

/// Every failure the pipeline distinguishes.
#[derive(Debug, Error)]
pub enum DeltaError {
    /// The component manifest violates the caller contract (blank name,
    /// malformed manifest file).
    #[error("invalid component manifest: {0}")]
    InvalidManifest(String),

    /// Version-control state for the reference point cannot be resolved.
    #[error("version-control state unavailable: {0}")]
    ScanUnavailable(String),

    /// No component manifest file exists under the root.
    #[error("no component manifest at {}", .0.display())]
    ManifestMissing(PathBuf),

    /// The project manifest text is not a structured key/value document.
    #[error("project manifest could not be parsed: {0}")]
    UnparseableProjectManifest(String),

    /// An external collaborator (filesystem, git tooling, emitter) failed.
    #[error("{stage} failed: {message}")]
    Collaborator {
        /// Pipeline stage that failed.
        stage: &'static str,
        /// Human-readable cause.
        message: String,
    },
}

impl DeltaError {
    /// Wraps a port error as a fatal collaborator failure.
    pub fn collaborator(stage: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Collaborator { stage, message: err.to_string() }
    }

    /// Returns `true` for conditions the pipeline recovers from locally.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::ScanUnavailable(_)
                | Self::ManifestMissing(_)
                | Self::UnparseableProjectManifest(_)
        )
    }
}
