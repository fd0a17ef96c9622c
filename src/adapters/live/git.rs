//! Live git adapter using `git` CLI commands.

use std::path::Path;
use std::process::{Command, Output};

use crate::model::{Alteration, FileChange};
use crate::ports::git::GitRepo;

/// Live git adapter that shells out to the `git` CLI.
pub struct LiveGitRepo;

/// Runs `git` in `root` with paths printed verbatim.
fn git(root: &Path, args: &[&str]) -> Result<Output, Box<dyn std::error::Error + Send + Sync>> {
    let output = Command::new("git")
        .args(["-c", "core.quotePath=false"])
        .args(args)
        .current_dir(root)
        .output()
        .map_err(|e| format!("failed to run git: {e}"))?;
    Ok(output)
}

/// Runs `git` and fails on a non-zero exit status.
fn git_checked(
    root: &Path,
    args: &[&str],
) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
    let output = git(root, args)?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!("git {} failed: {}", args.join(" "), stderr.trim()).into());
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Parses `git diff --name-status -z` output: NUL-separated status and
/// path records, paths verbatim.
///
/// `A` maps to added, `D` to deleted, every other status to modified.
fn parse_name_status(stdout: &str) -> Vec<FileChange> {
    let mut fields = stdout.split('\0');
    let mut changes = Vec::new();
    while let Some(status) = fields.next() {
        let Some(code) = status.chars().next() else {
            continue;
        };
        let Some(path) = fields.next().filter(|p| !p.is_empty()) else {
            break;
        };
        let status = match code {
            'A' => Alteration::Added,
            'D' => Alteration::Deleted,
            _ => Alteration::Modified,
        };
        changes.push(FileChange::new(status, path));
    }
    changes
}

/// Parses NUL-separated `git ls-files -z` output.
fn parse_path_list(stdout: &str) -> impl Iterator<Item = &str> {
    stdout.split('\0').filter(|path| !path.is_empty())
}

impl GitRepo for LiveGitRepo {
    fn resolve_reference(
        &self,
        root: &Path,
        reference: &str,
    ) -> Result<Option<String>, Box<dyn std::error::Error + Send + Sync>> {
        let spec = format!("{reference}^{{commit}}");
        let output = git(root, &["rev-parse", "--verify", "--quiet", &spec])?;
        if !output.status.success() {
            return Ok(None);
        }
        let hash = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok((!hash.is_empty()).then_some(hash))
    }

    fn changed_files(
        &self,
        root: &Path,
        reference: &str,
    ) -> Result<Vec<FileChange>, Box<dyn std::error::Error + Send + Sync>> {
        let diff = git_checked(
            root,
            &["diff", "-z", "--name-status", "--no-renames", "--relative", reference, "--"],
        )?;
        let mut changes = parse_name_status(&diff);

        let untracked =
            git_checked(root, &["ls-files", "-z", "--others", "--exclude-standard"])?;
        changes.extend(
            parse_path_list(&untracked).map(|path| FileChange::new(Alteration::Added, path)),
        );
        Ok(changes)
    }

    fn reinitialize(
        &self,
        root: &Path,
        message: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        git_checked(root, &["init"])?;
        git_checked(root, &["add", "."])?;
        git_checked(root, &["commit", "-m", message])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nul_separated_name_status() {
        let changes = parse_name_status("M\0src/a.ts\0A\0new.ts\0D\0old.ts\0T\0link\0");
        assert_eq!(
            changes,
            vec![
                FileChange::new(Alteration::Modified, "src/a.ts"),
                FileChange::new(Alteration::Added, "new.ts"),
                FileChange::new(Alteration::Deleted, "old.ts"),
                FileChange::new(Alteration::Modified, "link"),
            ]
        );
    }

    #[test]
    fn keeps_quotes_tabs_and_spaces_in_paths() {
        let changes = parse_name_status("M\0a\"b.txt\0M\0 padded \0A\0back\\slash.txt\0");
        assert_eq!(
            changes,
            vec![
                FileChange::new(Alteration::Modified, "a\"b.txt"),
                FileChange::new(Alteration::Modified, " padded "),
                FileChange::new(Alteration::Added, "back\\slash.txt"),
            ]
        );
        let untracked: Vec<&str> = parse_path_list("new\tfile.txt\0line\nbreak.txt\0").collect();
        assert_eq!(untracked, vec!["new\tfile.txt", "line\nbreak.txt"]);
    }

    #[test]
    fn ignores_truncated_records() {
        assert!(parse_name_status("").is_empty());
        assert!(parse_name_status("M\0").is_empty());
    }
}
