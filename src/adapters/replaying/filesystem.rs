//! Replaying adapter for the `FileSystem` port.

use std::path::Path;
use std::sync::Mutex;

use super::{next_output, replay_result};
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::filesystem::FileSystem;

/// Replays recorded filesystem operations from a cassette.
pub struct ReplayingFileSystem {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingFileSystem {
    /// Creates a new replaying filesystem from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }

    fn replay_bool(&self, method: &str) -> bool {
        let output = next_output(&self.replayer, "fs", method);
        output.as_bool().unwrap_or_else(|| panic!("fs::{method}: expected boolean output"))
    }
}

impl FileSystem for ReplayingFileSystem {
    fn read_to_string(
        &self,
        _path: &Path,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        replay_result(&self.replayer, "fs", "read_to_string")
    }

    fn write(
        &self,
        _path: &Path,
        _contents: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        replay_result(&self.replayer, "fs", "write")
    }

    fn exists(&self, _path: &Path) -> bool {
        self.replay_bool("exists")
    }

    fn is_dir(&self, _path: &Path) -> bool {
        self.replay_bool("is_dir")
    }

    fn remove_dir_all(&self, _path: &Path) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        replay_result(&self.replayer, "fs", "remove_dir_all")
    }

    fn walk_files(
        &self,
        _root: &Path,
    ) -> Result<Vec<String>, Box<dyn std::error::Error + Send + Sync>> {
        replay_result(&self.replayer, "fs", "walk_files")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::format::{Cassette, Interaction};
    use chrono::Utc;
    use serde_json::json;

    fn make_replayer(interactions: Vec<(&str, serde_json::Value)>) -> CassetteReplayer {
        let interactions = interactions
            .into_iter()
            .zip(0..)
            .map(|((method, output), seq)| Interaction {
                seq,
                port: "fs".into(),
                method: method.into(),
                input: json!({}),
                output,
            })
            .collect();
        let cassette = Cassette {
            name: "test".into(),
            recorded_at: Utc::now(),
            commit: "abc".into(),
            interactions,
        };
        CassetteReplayer::new(&cassette)
    }

    #[test]
    fn replaying_fs_read_to_string_error() {
        let fs = ReplayingFileSystem::new(make_replayer(vec![(
            "read_to_string",
            json!({"err": "file not found"}),
        )]));
        let result = fs.read_to_string(Path::new("/missing"));
        assert!(result.unwrap_err().to_string().contains("file not found"));
    }

    #[test]
    fn replaying_fs_queries_and_walk() {
        let fs = ReplayingFileSystem::new(make_replayer(vec![
            ("exists", json!(true)),
            ("is_dir", json!(false)),
            ("walk_files", json!({"ok": ["a.txt", "src/b.ts"]})),
            ("write", json!({"ok": null})),
            ("remove_dir_all", json!({"ok": null})),
        ]));
        assert!(fs.exists(Path::new("/w/components.json")));
        assert!(!fs.is_dir(Path::new("/w/src")));
        assert_eq!(fs.walk_files(Path::new("/w")).unwrap(), vec!["a.txt", "src/b.ts"]);
        assert!(fs.write(Path::new("/w/.gitignore"), "x").is_ok());
        assert!(fs.remove_dir_all(Path::new("/w/.git")).is_ok());
    }
}
