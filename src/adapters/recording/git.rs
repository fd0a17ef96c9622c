//! Recording adapter for the `GitRepo` port.

use std::path::Path;
use std::sync::{Arc, Mutex};

use serde::Serialize;

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::model::FileChange;
use crate::ports::GitRepo;

/// Records git interactions while delegating to an inner implementation.
pub struct RecordingGitRepo {
    inner: Box<dyn GitRepo>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingGitRepo {
    /// Creates a new recording git repo wrapping the given implementation.
    pub fn new(inner: Box<dyn GitRepo>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

#[derive(Serialize)]
struct ReferenceInput<'a> {
    root: String,
    reference: &'a str,
}

#[derive(Serialize)]
struct InitInput<'a> {
    root: String,
    message: &'a str,
}

impl GitRepo for RecordingGitRepo {
    fn resolve_reference(
        &self,
        root: &Path,
        reference: &str,
    ) -> Result<Option<String>, Box<dyn std::error::Error + Send + Sync>> {
        let result = self.inner.resolve_reference(root, reference);
        let input = ReferenceInput { root: root.display().to_string(), reference };
        record_result(&self.recorder, "git", "resolve_reference", &input, &result);
        result
    }

    fn changed_files(
        &self,
        root: &Path,
        reference: &str,
    ) -> Result<Vec<FileChange>, Box<dyn std::error::Error + Send + Sync>> {
        let result = self.inner.changed_files(root, reference);
        let input = ReferenceInput { root: root.display().to_string(), reference };
        record_result(&self.recorder, "git", "changed_files", &input, &result);
        result
    }

    fn reinitialize(
        &self,
        root: &Path,
        message: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let result = self.inner.reinitialize(root, message);
        let input = InitInput { root: root.display().to_string(), message };
        record_result(&self.recorder, "git", "reinitialize", &input, &result);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::replaying::ReplayingGitRepo;
    use crate::cassette::format::Cassette;
    use crate::cassette::replayer::CassetteReplayer;
    use crate::model::Alteration;

    /// Fixed-answer repository standing in for the git CLI.
    struct StaticRepo;

    impl GitRepo for StaticRepo {
        fn resolve_reference(
            &self,
            _root: &Path,
            _reference: &str,
        ) -> Result<Option<String>, Box<dyn std::error::Error + Send + Sync>> {
            Ok(Some("abc123".into()))
        }

        fn changed_files(
            &self,
            _root: &Path,
            _reference: &str,
        ) -> Result<Vec<FileChange>, Box<dyn std::error::Error + Send + Sync>> {
            Ok(vec![FileChange::new(Alteration::Modified, "a.txt")])
        }

        fn reinitialize(
            &self,
            _root: &Path,
            _message: &str,
        ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
            Err("git init failed: permission denied".into())
        }
    }

    #[test]
    fn records_every_git_operation() {
        let dir = std::env::temp_dir().join("pkgdelta_rec_git_test");
        std::fs::create_dir_all(&dir).unwrap();
        let cassette_path = dir.join("git.cassette.yaml");
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(&cassette_path, "test", "abc")));

        {
            let git = RecordingGitRepo::new(Box::new(StaticRepo), Arc::clone(&recorder));
            let root = Path::new("/work/widget");
            let _ = git.resolve_reference(root, "HEAD");
            let _ = git.changed_files(root, "HEAD");
            let _ = git.reinitialize(root, "Initial commit");
        }

        let recorder = Arc::try_unwrap(recorder).unwrap().into_inner().unwrap();
        recorder.finish().unwrap();

        let cassette = Cassette::load(&cassette_path).unwrap();
        assert_eq!(cassette.count_for("git"), 3);
        assert_eq!(cassette.interactions[0].input["reference"], "HEAD");

        let replay = ReplayingGitRepo::new(CassetteReplayer::new(&cassette));
        let root = Path::new("/work/widget");
        assert_eq!(replay.resolve_reference(root, "HEAD").unwrap().as_deref(), Some("abc123"));
        assert_eq!(replay.changed_files(root, "HEAD").unwrap()[0].path, "a.txt");
        assert!(replay.reinitialize(root, "Initial commit").is_err());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
