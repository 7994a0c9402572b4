//! Repository commit fingerprint.
//!
//! Reads `.git/HEAD` directly, following a symbolic ref into `refs/` or
//! `packed-refs`. No git binary is involved.

use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::debug;

fn commit_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9a-f]{40}([0-9a-f]{24})?$").expect("invalid regex"))
}

fn as_commit(text: &str) -> Option<String> {
    let text = text.trim();
    commit_pattern()
        .is_match(text)
        .then(|| text.to_string())
}

/// Locates the git directory for `start` or its nearest ancestor.
fn find_git_dir(start: &Path) -> Option<PathBuf> {
    for dir in start.ancestors() {
        let candidate = dir.join(".git");
        if candidate.is_dir() {
            return Some(candidate);
        }
        if candidate.is_file() {
            // Worktrees and submodules: `gitdir: <path>`.
            let content = fs::read_to_string(&candidate).ok()?;
            let target = content.trim().strip_prefix("gitdir:")?.trim();
            return Some(dir.join(target));
        }
    }
    None
}

fn resolve_ref(git_dir: &Path, name: &str) -> Option<String> {
    if let Ok(content) = fs::read_to_string(git_dir.join(name)) {
        if let Some(commit) = as_commit(&content) {
            return Some(commit);
        }
    }
    let packed = fs::read_to_string(git_dir.join("packed-refs")).ok()?;
    packed
        .lines()
        .filter(|line| !line.starts_with('#') && !line.starts_with('^'))
        .filter_map(|line| line.split_once(' '))
        .find(|(_, reference)| reference.trim() == name)
        .and_then(|(commit, _)| as_commit(commit))
}

/// Commit checked out in the repository containing `start`, if any.
///
/// Absence of a repository, or an unreadable one, yields `None`.
pub fn repository_commit(start: &Path) -> Option<String> {
    let start = start.canonicalize().unwrap_or_else(|_| start.to_path_buf());
    let git_dir = find_git_dir(&start)?;
    let head = fs::read_to_string(git_dir.join("HEAD")).ok()?;
    let commit = match head.trim().strip_prefix("ref:") {
        Some(name) => resolve_ref(&git_dir, name.trim()),
        None => as_commit(&head),
    };
    debug!(git_dir = %git_dir.display(), commit = ?commit, "resolved repository commit");
    commit
}

#[cfg(test)]
mod tests {
    use super::*;

    const COMMIT: &str = "0123456789abcdef0123456789abcdef01234567";

    #[test]
    fn follows_loose_refs() {
        let dir = tempfile::tempdir().unwrap();
        let git = dir.path().join(".git");
        fs::create_dir_all(git.join("refs/heads")).unwrap();
        fs::write(git.join("HEAD"), "ref: refs/heads/main\n").unwrap();
        fs::write(git.join("refs/heads/main"), format!("{}\n", COMMIT)).unwrap();

        let nested = dir.path().join("data/mechs");
        fs::create_dir_all(&nested).unwrap();
        assert_eq!(repository_commit(&nested).as_deref(), Some(COMMIT));
    }

    #[test]
    fn falls_back_to_packed_refs() {
        let dir = tempfile::tempdir().unwrap();
        let git = dir.path().join(".git");
        fs::create_dir_all(&git).unwrap();
        fs::write(git.join("HEAD"), "ref: refs/heads/main\n").unwrap();
        fs::write(
            git.join("packed-refs"),
            format!("# pack-refs with: peeled\n{} refs/heads/main\n", COMMIT),
        )
        .unwrap();
        assert_eq!(repository_commit(dir.path()).as_deref(), Some(COMMIT));
    }

    #[test]
    fn detached_head_is_the_commit() {
        let dir = tempfile::tempdir().unwrap();
        let git = dir.path().join(".git");
        fs::create_dir_all(&git).unwrap();
        fs::write(git.join("HEAD"), COMMIT).unwrap();
        assert_eq!(repository_commit(dir.path()).as_deref(), Some(COMMIT));
    }
}
