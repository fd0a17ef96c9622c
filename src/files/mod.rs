//! File enumerator: the current file listing of a component root.

pub mod rules;

use std::path::Path;

use tracing::debug;

use crate::context::ServiceContext;
use crate::error::{DeltaError, Result};
use crate::model::CurrentFileSet;

pub use rules::IgnoreRules;

/// Name of the ignore files honored in the root and every subdirectory.
pub const IGNORE_FILE: &str = ".gitignore";

/// The current file listing together with the rules that produced it.
#[derive(Debug)]
pub struct FileListing {
    /// Files kept by the rules.
    pub current: CurrentFileSet,
    /// Rules to apply to any other path reported for this root.
    pub rules: IgnoreRules,
}

/// Loads every ignore file among `walked` (shallowest first) followed by
/// `extra` patterns. Ignore files inside an already excluded directory are
/// skipped, as git never looks at them.
///
/// # Errors
///
/// Returns [`DeltaError::Collaborator`] if an ignore file cannot be read.
pub fn load_ignore_rules(
    ctx: &ServiceContext,
    root: &Path,
    walked: &[String],
    extra: &[String],
) -> Result<IgnoreRules> {
    let mut dirs: Vec<&str> = walked
        .iter()
        .filter_map(|path| match path.rsplit_once('/') {
            Some((dir, IGNORE_FILE)) => Some(dir),
            None if path == IGNORE_FILE => Some(""),
            _ => None,
        })
        .collect();
    dirs.sort_by_key(|dir| (dir.split('/').count(), *dir));

    let mut rules = IgnoreRules::new(root, extra);
    for dir in dirs {
        if rules.is_ignored_dir(dir) {
            continue;
        }
        let path = if dir.is_empty() {
            root.join(IGNORE_FILE)
        } else {
            root.join(dir).join(IGNORE_FILE)
        };
        let text =
            ctx.fs.read_to_string(&path).map_err(|e| DeltaError::collaborator("enumerate", e))?;
        rules.add_ignore_file(dir, &text);
    }
    Ok(rules)
}

/// Walk `root` and keep every file the ignore rules allow.
///
/// Paths are root-relative; `.git` is never listed.
///
/// # Errors
///
/// Returns [`DeltaError::Collaborator`] if the root cannot be traversed or an
/// ignore file cannot be read.
pub fn enumerate(ctx: &ServiceContext, root: &Path, extra: &[String]) -> Result<FileListing> {
    let walked = ctx.fs.walk_files(root).map_err(|e| DeltaError::collaborator("enumerate", e))?;
    let rules = load_ignore_rules(ctx, root, &walked, extra)?;

    let current: CurrentFileSet = walked.iter().filter(|f| !rules.is_ignored(f)).collect();
    debug!(
        walked = walked.len(),
        kept = current.len(),
        ignore_files = rules.len(),
        "enumerated files"
    );
    Ok(FileListing { current, rules })
}

/// The current file listing of `root`; see [`enumerate`].
///
/// # Errors
///
/// Same as [`enumerate`].
pub fn list_files(ctx: &ServiceContext, root: &Path, extra: &[String]) -> Result<CurrentFileSet> {
    enumerate(ctx, root, extra).map(|listing| listing.current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::format::{Cassette, Interaction};
    use crate::cassette::replayer::CassetteReplayer;
    use serde_json::json;

    fn fs_context(outputs: Vec<(&str, serde_json::Value)>) -> ServiceContext {
        let interactions = outputs
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
            name: "files".into(),
            recorded_at: chrono::Utc::now(),
            commit: "abc".into(),
            interactions,
        };
        ServiceContext::from_replayers(Some(CassetteReplayer::new(&cassette)), None)
    }

    #[test]
    fn listing_applies_gitignore_and_extra_patterns() {
        let ctx = fs_context(vec![
            (
                "walk_files",
                json!({"ok": [
                    ".gitignore",
                    "node_modules/react/index.js",
                    "debug.log",
                    "package.json",
                    "src/index.ts",
                    "dist/bundle.js"
                ]}),
            ),
            ("read_to_string", json!({"ok": "/node_modules\n*.log\n"})),
        ]);
        let current = list_files(&ctx, Path::new("/w"), &["/dist".to_string()]).unwrap();
        let paths: Vec<&str> = current.paths.iter().map(String::as_str).collect();
        assert_eq!(paths, vec![".gitignore", "package.json", "src/index.ts"]);
    }

    #[test]
    fn nested_ignore_files_apply_below_their_directory() {
        let ctx = fs_context(vec![
            (
                "walk_files",
                json!({"ok": [
                    ".gitignore",
                    "secret.txt",
                    "sub/.gitignore",
                    "sub/secret.txt",
                    "sub/notes.md",
                    "vendor/.gitignore",
                    "vendor/lib.js"
                ]}),
            ),
            ("read_to_string", json!({"ok": "/vendor\n"})),
            ("read_to_string", json!({"ok": "secret.txt\n"})),
        ]);
        let listing = enumerate(&ctx, Path::new("/w"), &[]).unwrap();
        let paths: Vec<&str> = listing.current.paths.iter().map(String::as_str).collect();
        assert_eq!(paths, vec![".gitignore", "secret.txt", "sub/.gitignore", "sub/notes.md"]);
        assert_eq!(listing.rules.len(), 2);
        assert!(listing.rules.is_ignored("sub/secret.txt"));
    }

    #[test]
    fn listing_without_ignore_file_keeps_everything() {
        let ctx = fs_context(vec![("walk_files", json!({"ok": ["b.txt", "a.txt"]}))]);
        let current = list_files(&ctx, Path::new("/w"), &[]).unwrap();
        assert_eq!(current.len(), 2);
        assert!(current.contains("a.txt"));
    }

    #[test]
    fn unreadable_ignore_file_is_fatal() {
        let ctx = fs_context(vec![
            ("walk_files", json!({"ok": [".gitignore", "a.txt"]})),
            ("read_to_string", json!({"err": "permission denied"})),
        ]);
        let err = list_files(&ctx, Path::new("/w"), &[]).unwrap_err();
        assert_eq!(err.to_string(), "enumerate failed: permission denied");
    }

    #[test]
    fn walk_failure_is_fatal() {
        let ctx = fs_context(vec![("walk_files", json!({"err": "permission denied"}))]);
        let err = list_files(&ctx, Path::new("/w"), &[]).unwrap_err();
        assert_eq!(err.to_string(), "enumerate failed: permission denied");
    }
}
