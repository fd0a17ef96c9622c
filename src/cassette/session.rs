//! Recording session managing per-port cassette recorders.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use tracing::warn;

use super::recorder::CassetteRecorder;

/// Manages per-port `CassetteRecorder` instances for a recording session.
///
/// Each port gets its own recorder writing to a separate cassette file.
/// All cassettes are stored in a timestamped directory.
pub struct RecordingSession {
    /// Recorder for filesystem interactions.
    pub fs: Arc<Mutex<CassetteRecorder>>,
    /// Recorder for git interactions.
    pub git: Arc<Mutex<CassetteRecorder>>,
    /// Output directory containing all cassette files.
    output_dir: PathBuf,
}

impl RecordingSession {
    /// Create a new recording session below `base`.
    ///
    /// Cassettes go to `<base>/<timestamp>/`. `commit` is stored in every
    /// cassette header.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The cassette directory already exists
    /// - The directory cannot be created
    pub fn new(base: &Path, commit: &str) -> Result<Self, String> {
        let timestamp = Utc::now().format("%Y-%m-%dT%H-%M-%S%.3f").to_string();
        let output_dir = base.join(&timestamp);

        if output_dir.exists() {
            return Err(format!("Cassette directory already exists: {}", output_dir.display()));
        }

        std::fs::create_dir_all(&output_dir)
            .map_err(|e| format!("Failed to create cassette directory: {e}"))?;

        let make_recorder = |port: &str| -> Arc<Mutex<CassetteRecorder>> {
            let path = output_dir.join(format!("{port}.cassette.yaml"));
            let name = format!("{timestamp}-{port}");
            Arc::new(Mutex::new(CassetteRecorder::new(path, name, commit)))
        };

        Ok(Self { fs: make_recorder("fs"), git: make_recorder("git"), output_dir })
    }

    /// Directory the cassettes are written to.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Finish all recorders and write cassette files to disk.
    ///
    /// The adapters holding recorder handles must be dropped first.
    ///
    /// # Errors
    ///
    /// Returns an error if a recorder is still shared or a cassette file
    /// cannot be written.
    pub fn finish(self) -> Result<PathBuf, String> {
        fn finish_one(arc: Arc<Mutex<CassetteRecorder>>, port: &str) -> Result<(), String> {
            let recorder = Arc::try_unwrap(arc)
                .map_err(|_| format!("Recording adapter for {port} still has references"))?
                .into_inner()
                .map_err(|e| format!("Recorder lock for {port} poisoned: {e}"))?;
            recorder.finish().map_err(|e| format!("Failed to write {port} cassette: {e}"))?;
            Ok(())
        }

        finish_one(self.fs, "fs")?;
        finish_one(self.git, "git")?;

        Ok(self.output_dir)
    }
}

/// Current commit of the repository containing `root`, or `"unknown"`.
#[must_use]
pub fn commit_hash(root: &Path) -> String {
    let hash = std::process::Command::new("git")
        .args(["rev-parse", "HEAD"])
        .current_dir(root)
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map(|s| s.trim().to_string());

    hash.unwrap_or_else(|| {
        warn!(root = %root.display(), "could not determine commit hash, using 'unknown'");
        "unknown".to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::config::CassetteConfig;
    use serde_json::json;

    #[test]
    fn session_writes_one_cassette_per_port() {
        let base = std::env::temp_dir().join("pkgdelta_session_test");
        let _ = std::fs::remove_dir_all(&base);

        let session = RecordingSession::new(&base, "abc123").unwrap();
        assert!(session.output_dir().exists());
        session.git.lock().unwrap().record(
            "git",
            "resolve_reference",
            json!({"reference": "HEAD"}),
            json!({"ok": "abc123"}),
        );

        let dir = session.finish().unwrap();
        let config = CassetteConfig::from_dir(&dir);
        assert!(config.fs.is_some());
        assert!(config.git.is_some());

        let _ = std::fs::remove_dir_all(&base);
    }

    #[test]
    fn finish_fails_while_a_recorder_is_shared() {
        let base = std::env::temp_dir().join("pkgdelta_session_shared");
        let _ = std::fs::remove_dir_all(&base);

        let session = RecordingSession::new(&base, "abc123").unwrap();
        let held = Arc::clone(&session.fs);
        let err = session.finish().unwrap_err();
        assert!(err.contains("still has references"));
        drop(held);

        let _ = std::fs::remove_dir_all(&base);
    }

    #[test]
    fn commit_hash_outside_repository_is_unknown_or_hash() {
        let hash = commit_hash(&std::env::temp_dir());
        assert!(!hash.is_empty());
    }
}
