//! Observation types gathered before the diff: what the scanner saw altered
//! and what currently exists under the component root.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// How the change scanner saw a path differ from the reference point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alteration {
    /// Not part of tracked history at the reference point.
    Added,
    /// Tracked and changed since the reference point.
    Modified,
    /// Tracked at the reference point and gone from the working tree.
    Deleted,
}

/// A single scanner observation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChange {
    /// The scanner's classification.
    pub status: Alteration,
    /// Path relative to the component root.
    pub path: String,
}

impl FileChange {
    /// Creates a change with a normalized path.
    pub fn new(status: Alteration, path: &str) -> Self {
        Self { status, path: normalize_path(path) }
    }
}

/// Files altered since the reference point plus flags for tracked files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlteredFileSet {
    /// Altered paths and the scanner's mark for each.
    pub paths: BTreeMap<String, Alteration>,
    /// Tracked file name → whether it changed.
    pub specific: BTreeMap<String, bool>,
}

impl AlteredFileSet {
    /// Builds the set from scanner observations, flagging each tracked file
    /// that appears among them.
    ///
    /// A path observed twice keeps its first mark unless a later one says
    /// `Added`, which wins so that untracked files are never downgraded.
    #[must_use]
    pub fn from_changes(changes: Vec<FileChange>, tracked: &[String]) -> Self {
        let mut paths = BTreeMap::new();
        for change in changes {
            let path = normalize_path(&change.path);
            if path.is_empty() {
                continue;
            }
            paths
                .entry(path)
                .and_modify(|existing| {
                    if change.status == Alteration::Added {
                        *existing = Alteration::Added;
                    }
                })
                .or_insert(change.status);
        }
        let specific = tracked
            .iter()
            .map(|name| {
                let key = normalize_path(name);
                let changed = paths.contains_key(&key);
                (key, changed)
            })
            .collect();
        Self { paths, specific }
    }

    /// The fallback used when no prior snapshot exists: every current file is
    /// new, and a tracked file counts as changed when it exists now.
    #[must_use]
    pub fn without_history(current: &CurrentFileSet, tracked: &[String]) -> Self {
        let paths = current.paths.iter().map(|p| (p.clone(), Alteration::Added)).collect();
        let specific = tracked
            .iter()
            .map(|name| {
                let key = normalize_path(name);
                let changed = current.contains(&key);
                (key, changed)
            })
            .collect();
        Self { paths, specific }
    }

    /// Iterates over altered paths in sorted order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.paths.keys().map(String::as_str)
    }

    /// Returns `true` if the scanner reported `path` as altered.
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.paths.contains_key(path)
    }

    /// The scanner's mark for `path`, if altered.
    #[must_use]
    pub fn alteration(&self, path: &str) -> Option<Alteration> {
        self.paths.get(path).copied()
    }

    /// Whether the tracked file `name` changed. Unknown names read as unchanged.
    #[must_use]
    pub fn is_specific_changed(&self, name: &str) -> bool {
        self.specific.get(&normalize_path(name)).copied().unwrap_or(false)
    }

    /// Keeps only the altered paths for which `keep` returns `true`.
    ///
    /// Tracked-file flags are left untouched.
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.paths.retain(|path, _| keep(path));
    }

    /// Returns `true` if nothing was altered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Every file currently under the component root, ignore rules applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentFileSet {
    /// Paths relative to the component root.
    pub paths: BTreeSet<String>,
}

impl CurrentFileSet {
    /// Returns `true` if `path` exists in the listing.
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    /// Number of files listed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Returns `true` if the listing is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for CurrentFileSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let paths = iter
            .into_iter()
            .map(|p| normalize_path(p.as_ref()))
            .filter(|p| !p.is_empty())
            .collect();
        Self { paths }
    }
}

/// Normalizes a root-relative path by dropping any leading `./`.
///
/// Every other byte of the name is kept, including surrounding whitespace
/// and quotes. On Windows, `\` separators become `/`.
#[must_use]
pub fn normalize_path(path: &str) -> String {
    let mut rest = path;
    while let Some(stripped) = rest.strip_prefix("./") {
        rest = stripped;
    }
    if cfg!(windows) {
        rest.replace('\\', "/")
    } else {
        rest.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracked(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| (*n).to_string()).collect()
    }

    #[test]
    fn normalize_strips_dot_prefix_only() {
        assert_eq!(normalize_path("./package.json"), "package.json");
        assert_eq!(normalize_path("././a.txt"), "a.txt");
        assert_eq!(normalize_path(" padded.txt "), " padded.txt ");
        assert_eq!(normalize_path("a\"b.txt"), "a\"b.txt");
        assert_eq!(normalize_path("new\tfile.txt"), "new\tfile.txt");
    }

    #[cfg(windows)]
    #[test]
    fn normalize_converts_windows_separators() {
        assert_eq!(normalize_path("src\\lib\\index.ts"), "src/lib/index.ts");
    }

    #[test]
    fn retain_drops_paths_but_keeps_tracked_flags() {
        let mut set = AlteredFileSet::from_changes(
            vec![
                FileChange::new(Alteration::Modified, "notes.log"),
                FileChange::new(Alteration::Modified, "package.json"),
            ],
            &tracked(&["package.json"]),
        );
        set.retain(|path| !path.ends_with(".log"));
        assert_eq!(set.paths().collect::<Vec<_>>(), vec!["package.json"]);
        assert!(set.is_specific_changed("package.json"));
    }

    #[test]
    fn from_changes_flags_tracked_files() {
        let set = AlteredFileSet::from_changes(
            vec![
                FileChange::new(Alteration::Modified, "package.json"),
                FileChange::new(Alteration::Added, "src/new.ts"),
            ],
            &tracked(&["./package.json", "README.md"]),
        );
        assert!(set.is_specific_changed("package.json"));
        assert!(set.is_specific_changed("./package.json"));
        assert!(!set.is_specific_changed("README.md"));
        assert_eq!(set.alteration("src/new.ts"), Some(Alteration::Added));
    }

    #[test]
    fn added_mark_wins_over_duplicate_observation() {
        let set = AlteredFileSet::from_changes(
            vec![
                FileChange::new(Alteration::Deleted, "a.txt"),
                FileChange::new(Alteration::Added, "a.txt"),
            ],
            &[],
        );
        assert_eq!(set.alteration("a.txt"), Some(Alteration::Added));
    }

    #[test]
    fn without_history_marks_everything_added() {
        let current: CurrentFileSet = ["a.txt", "package.json"].into_iter().collect();
        let set = AlteredFileSet::without_history(&current, &tracked(&["package.json", "x"]));
        assert_eq!(set.paths().collect::<Vec<_>>(), vec!["a.txt", "package.json"]);
        assert!(set.paths.values().all(|a| *a == Alteration::Added));
        assert!(set.is_specific_changed("package.json"));
        assert!(!set.is_specific_changed("x"));
    }

    #[test]
    fn alteration_serializes_snake_case() {
        let json = serde_json::to_string(&FileChange::new(Alteration::Deleted, "a")).unwrap();
        assert_eq!(json, r#"{"status":"deleted","path":"a"}"#);
    }
}
