//! Replaying adapter for the `GitRepo` port.

use std::path::Path;
use std::sync::Mutex;

use super::replay_result;
use crate::cassette::replayer::CassetteReplayer;
use crate::model::FileChange;
use crate::ports::git::GitRepo;

/// Replays recorded git operations from a cassette.
pub struct ReplayingGitRepo {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingGitRepo {
    /// Creates a new replaying git repo from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }
}

impl GitRepo for ReplayingGitRepo {
    fn resolve_reference(
        &self,
        _root: &Path,
        _reference: &str,
    ) -> Result<Option<String>, Box<dyn std::error::Error + Send + Sync>> {
        replay_result(&self.replayer, "git", "resolve_reference")
    }

    fn changed_files(
        &self,
        _root: &Path,
        _reference: &str,
    ) -> Result<Vec<FileChange>, Box<dyn std::error::Error + Send + Sync>> {
        replay_result(&self.replayer, "git", "changed_files")
    }

    fn reinitialize(
        &self,
        _root: &Path,
        _message: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        replay_result(&self.replayer, "git", "reinitialize")
    }
}
