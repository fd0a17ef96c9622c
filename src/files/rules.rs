//! Gitignore rules applied to the file listing and the altered set.
//!
//! Each `.gitignore` governs the directory holding it and everything below;
//! a deeper file's decision overrides a shallower one. Extra patterns given
//! on the command line apply from the root and always exclude.

use std::path::{Path, PathBuf};

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use ignore::Match;
use tracing::warn;

/// The rules of one ignore file, rooted at the directory holding it.
struct Layer {
    /// Root-relative directory, empty for the component root.
    dir: String,
    gitignore: Gitignore,
}

impl Layer {
    fn governs(&self, path: &str) -> bool {
        self.dir.is_empty()
            || path.strip_prefix(self.dir.as_str()).is_some_and(|rest| rest.starts_with('/'))
    }
}

/// Every ignore rule that applies below a component root.
pub struct IgnoreRules {
    root: PathBuf,
    extra: Gitignore,
    /// Sorted from shallowest to deepest directory.
    layers: Vec<Layer>,
}

impl std::fmt::Debug for IgnoreRules {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IgnoreRules")
            .field("root", &self.root)
            .field("extra", &self.extra.num_ignores())
            .field("layers", &self.layers.iter().map(|l| l.dir.as_str()).collect::<Vec<_>>())
            .finish()
    }
}

impl IgnoreRules {
    /// Rules with no ignore files, only the `extra` patterns.
    ///
    /// Invalid patterns are logged and skipped.
    #[must_use]
    pub fn new(root: &Path, extra: &[String]) -> Self {
        Self {
            root: root.to_path_buf(),
            extra: compile(root, extra.iter().map(String::as_str), "--ignore"),
            layers: Vec::new(),
        }
    }

    /// Adds the contents of the ignore file found in root-relative `dir`.
    ///
    /// Invalid lines are logged and skipped, as git does.
    pub fn add_ignore_file(&mut self, dir: &str, text: &str) {
        let dir = dir.trim_end_matches('/').to_string();
        let base = if dir.is_empty() { self.root.clone() } else { self.root.join(&dir) };
        let gitignore = compile(&base, text.lines(), &dir);
        let at = self.layers.partition_point(|l| depth(&l.dir) <= depth(&dir));
        self.layers.insert(at, Layer { dir, gitignore });
    }

    /// Number of ignore files loaded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Returns `true` if no ignore file was loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Whether the root-relative file `path` is excluded.
    #[must_use]
    pub fn is_ignored(&self, path: &str) -> bool {
        self.decide(path, false)
    }

    /// Whether the root-relative directory `path` is excluded.
    #[must_use]
    pub fn is_ignored_dir(&self, path: &str) -> bool {
        self.decide(path, true)
    }

    /// Ancestor directories decide first: nothing below an excluded
    /// directory can be re-included.
    fn decide(&self, path: &str, is_dir: bool) -> bool {
        if path.is_empty() {
            return false;
        }
        let mut end = 0;
        while let Some(offset) = path[end..].find('/') {
            end += offset;
            if self.decide_one(&path[..end], true) {
                return true;
            }
            end += 1;
        }
        self.decide_one(path, is_dir)
    }

    fn decide_one(&self, path: &str, is_dir: bool) -> bool {
        let candidate = self.root.join(path);
        if self.extra.matched(&candidate, is_dir).is_ignore() {
            return true;
        }
        for layer in self.layers.iter().rev().filter(|l| l.governs(path)) {
            match layer.gitignore.matched(&candidate, is_dir) {
                Match::Ignore(_) => return true,
                Match::Whitelist(_) => return false,
                Match::None => {}
            }
        }
        false
    }
}

fn depth(dir: &str) -> usize {
    if dir.is_empty() {
        0
    } else {
        dir.matches('/').count() + 1
    }
}

fn compile<'a>(base: &Path, lines: impl Iterator<Item = &'a str>, origin: &str) -> Gitignore {
    let mut builder = GitignoreBuilder::new(base);
    for line in lines {
        if let Err(err) = builder.add_line(None, line) {
            warn!(origin, pattern = line, error = %err, "skipping invalid ignore pattern");
        }
    }
    builder.build().unwrap_or_else(|err| {
        warn!(origin, error = %err, "failed to compile ignore patterns");
        Gitignore::empty()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules(text: &str) -> IgnoreRules {
        let mut rules = IgnoreRules::new(Path::new("/w"), &[]);
        rules.add_ignore_file("", text);
        rules
    }

    #[test]
    fn anchored_directory_excludes_everything_below() {
        let rules = rules("# deps\n/node_modules\n/.next/\n");
        assert!(rules.is_ignored("node_modules/react/index.js"));
        assert!(rules.is_ignored(".next/cache/x"));
        assert!(!rules.is_ignored("src/node_modules/x.js"));
        assert!(!rules.is_ignored(".next"));
    }

    #[test]
    fn unanchored_patterns_match_names_at_any_depth() {
        let rules = rules(".DS_Store\n*.pem\n.env*\nnpm-debug.log*\n");
        assert!(rules.is_ignored("src/ui/.DS_Store"));
        assert!(rules.is_ignored("certs/server.pem"));
        assert!(rules.is_ignored(".env.local"));
        assert!(rules.is_ignored("npm-debug.log.1"));
        assert!(!rules.is_ignored("src/env.ts"));
    }

    #[test]
    fn negation_reincludes_later_matches() {
        let rules = rules(".yarn/*\n!.yarn/patches\n!.yarn/releases\n");
        assert!(rules.is_ignored(".yarn/cache/pkg.zip"));
        assert!(!rules.is_ignored(".yarn/patches/fix.patch"));
        assert!(!rules.is_ignored(".yarn/releases/yarn.cjs"));
    }

    #[test]
    fn file_under_ignored_directory_cannot_be_reincluded() {
        let rules = rules("/build\n!/build/keep.txt\n");
        assert!(rules.is_ignored("build/keep.txt"));
    }

    #[test]
    fn nested_ignore_file_governs_its_directory_only() {
        let mut rules = rules("*.log\n");
        rules.add_ignore_file("sub", "secret.txt\n!keep.log\n");
        assert!(rules.is_ignored("sub/secret.txt"));
        assert!(rules.is_ignored("sub/deeper/secret.txt"));
        assert!(!rules.is_ignored("secret.txt"));
        assert!(!rules.is_ignored("sub/keep.log"));
        assert!(rules.is_ignored("other/keep.log"));
        assert_eq!(rules.len(), 2);
    }

    #[test]
    fn extra_patterns_always_exclude() {
        let mut rules = IgnoreRules::new(Path::new("/w"), &["*.snap".to_string()]);
        rules.add_ignore_file("", "!*.snap\n");
        assert!(rules.is_ignored("tests/__snapshots__/a.snap"));
        assert!(!rules.is_ignored("tests/a.ts"));
    }

    #[test]
    fn directory_only_rule_ignores_directories() {
        let rules = rules("out/\n");
        assert!(!rules.is_ignored("out"));
        assert!(rules.is_ignored("out/index.html"));
        assert!(rules.is_ignored_dir("out"));
    }

    #[test]
    fn empty_rules_ignore_nothing() {
        let rules = IgnoreRules::new(Path::new("/w"), &[]);
        assert!(rules.is_empty());
        assert!(!rules.is_ignored("anything"));
    }
}
