//! Service context bundling all port trait objects.

use std::path::Path;
use std::sync::Arc;

use crate::adapters::live::filesystem::LiveFileSystem;
use crate::adapters::live::git::LiveGitRepo;
use crate::adapters::recording::{RecordingFileSystem, RecordingGitRepo};
use crate::adapters::replaying::{ReplayingFileSystem, ReplayingGitRepo};
use crate::cassette::config::CassetteConfig;
use crate::cassette::format::Cassette;
use crate::cassette::replayer::CassetteReplayer;
use crate::cassette::session::{commit_hash, RecordingSession};
use crate::model::FileChange;
use crate::ports::filesystem::FileSystem;
use crate::ports::git::GitRepo;

/// Bundles all port trait objects into a single context.
///
/// Each field provides access to one external boundary. Constructors
/// wire up different adapter implementations (live, replaying, recording).
pub struct ServiceContext {
    /// Filesystem for file I/O and enumeration.
    pub fs: Box<dyn FileSystem>,
    /// Git repository for version-control queries.
    pub git: Box<dyn GitRepo>,
}

impl ServiceContext {
    /// Creates a live context backed by the real disk and the `git` CLI.
    #[must_use]
    pub fn live() -> Self {
        Self { fs: Box::new(LiveFileSystem), git: Box::new(LiveGitRepo) }
    }

    /// Creates a live context whose port interactions are recorded to
    /// per-port cassettes below `base`.
    ///
    /// Drop the context before calling [`RecordingSession::finish`].
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette directory cannot be created.
    pub fn recording_at(base: &Path, root: &Path) -> Result<(Self, RecordingSession), String> {
        let session = RecordingSession::new(base, &commit_hash(root))?;
        let ctx = Self {
            fs: Box::new(RecordingFileSystem::new(
                Box::new(LiveFileSystem),
                Arc::clone(&session.fs),
            )),
            git: Box::new(RecordingGitRepo::new(
                Box::new(LiveGitRepo),
                Arc::clone(&session.git),
            )),
        };
        Ok((ctx, session))
    }

    /// Creates a replaying context from a monolithic cassette file.
    ///
    /// Each port gets its own replayer from the same cassette so that
    /// per-port cursors are independent.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be read or parsed.
    pub fn replaying(path: &Path) -> Result<Self, String> {
        let cassette = Cassette::load(path)?;
        Ok(Self::from_replayers(
            Some(CassetteReplayer::new(&cassette)),
            Some(CassetteReplayer::new(&cassette)),
        ))
    }

    /// Creates a replaying context from per-port cassette files.
    ///
    /// Ports without a configured cassette file use a panicking adapter
    /// that fails with a clear message when called.
    ///
    /// # Errors
    ///
    /// Returns an error if any configured cassette file cannot be read or parsed.
    pub fn replaying_from(config: &CassetteConfig) -> Result<Self, String> {
        let replayers = config.load_all()?;
        Ok(Self::from_replayers(replayers.fs, replayers.git))
    }

    /// Creates a replaying context from already-loaded replayers.
    #[must_use]
    pub fn from_replayers(fs: Option<CassetteReplayer>, git: Option<CassetteReplayer>) -> Self {
        Self {
            fs: match fs {
                Some(r) => Box::new(ReplayingFileSystem::new(r)),
                None => Box::new(PanickingFileSystem),
            },
            git: match git {
                Some(r) => Box::new(ReplayingGitRepo::new(r)),
                None => Box::new(PanickingGitRepo),
            },
        }
    }
}

// --- Panicking adapters for unspecified ports ---

const FS_UNCONFIGURED: &str =
    "FileSystem port not configured in CassetteConfig: no cassette loaded for fs";
const GIT_UNCONFIGURED: &str =
    "GitRepo port not configured in CassetteConfig: no cassette loaded for git";

struct PanickingFileSystem;
impl FileSystem for PanickingFileSystem {
    fn read_to_string(
        &self,
        _path: &Path,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        panic!("{FS_UNCONFIGURED}");
    }
    fn write(
        &self,
        _path: &Path,
        _contents: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        panic!("{FS_UNCONFIGURED}");
    }
    fn exists(&self, _path: &Path) -> bool {
        panic!("{FS_UNCONFIGURED}");
    }
    fn is_dir(&self, _path: &Path) -> bool {
        panic!("{FS_UNCONFIGURED}");
    }
    fn remove_dir_all(&self, _path: &Path) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        panic!("{FS_UNCONFIGURED}");
    }
    fn walk_files(
        &self,
        _root: &Path,
    ) -> Result<Vec<String>, Box<dyn std::error::Error + Send + Sync>> {
        panic!("{FS_UNCONFIGURED}");
    }
}

struct PanickingGitRepo;
impl GitRepo for PanickingGitRepo {
    fn resolve_reference(
        &self,
        _root: &Path,
        _reference: &str,
    ) -> Result<Option<String>, Box<dyn std::error::Error + Send + Sync>> {
        panic!("{GIT_UNCONFIGURED}");
    }
    fn changed_files(
        &self,
        _root: &Path,
        _reference: &str,
    ) -> Result<Vec<FileChange>, Box<dyn std::error::Error + Send + Sync>> {
        panic!("{GIT_UNCONFIGURED}");
    }
    fn reinitialize(
        &self,
        _root: &Path,
        _message: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        panic!("{GIT_UNCONFIGURED}");
    }
}
