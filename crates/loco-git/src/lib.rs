//! Git integration for loco
//!
//! Thin wrappers over the `git` binary for repository inspection plus
//! prompt template construction for commit messages and PR descriptions.
//! The prompts are handed to an external model runtime; nothing here
//! talks to a model.
//!
//! All operations take an explicit repository path so callers (and tests)
//! never depend on the process working directory.

pub mod prompt;

use std::path::Path;
use std::process::Command;
use thiserror::Error;
use tracing::debug;

/// Git invocation errors
#[derive(Debug, Error)]
pub enum GitError {
    /// The `git` binary is not on PATH
    #[error("git command not found")]
    GitNotFound,

    /// Underlying I/O failure while running git
    #[error("I/O error running git: {0}")]
    Io(#[from] std::io::Error),
}

/// Captured output of one git invocation
#[derive(Debug, Clone)]
pub struct GitOutput {
    /// True when git exited with code 0
    pub success: bool,
    /// Captured stdout
    pub stdout: String,
    /// Captured stderr
    pub stderr: String,
}

/// Run a git command in `repo` and capture its output.
///
/// A non-zero exit is not an error here; callers inspect `success`.
pub fn run_git(repo: &Path, args: &[&str]) -> Result<GitOutput, GitError> {
    let output = Command::new("git")
        .args(args)
        .current_dir(repo)
        .output()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                GitError::GitNotFound
            } else {
                GitError::Io(e)
            }
        })?;

    debug!("git {:?} -> {}", args, output.status);

    Ok(GitOutput {
        success: output.status.success(),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    })
}

/// Git repository status
#[derive(Debug, Clone, Default)]
pub struct GitStatus {
    /// True when the path is inside a git work tree
    pub is_repo: bool,
    /// Current branch name, if on a branch
    pub branch: Option<String>,
    /// Files with staged changes
    pub staged_files: Vec<String>,
    /// Files with unstaged changes
    pub unstaged_files: Vec<String>,
    /// Untracked files (respecting ignore rules)
    pub untracked_files: Vec<String>,
    /// Commits ahead of upstream
    pub ahead: u32,
    /// Commits behind upstream
    pub behind: u32,
}

impl GitStatus {
    /// Check if there are any changes to commit
    pub fn has_changes(&self) -> bool {
        !self.staged_files.is_empty() || !self.unstaged_files.is_empty()
    }

    /// Check if there are staged changes
    pub fn has_staged_changes(&self) -> bool {
        !self.staged_files.is_empty()
    }
}

/// One commit in the branch history
#[derive(Debug, Clone)]
pub struct Commit {
    /// Full commit hash
    pub hash: String,
    /// Subject line
    pub subject: String,
    /// Author name
    pub author: String,
    /// Author email
    pub email: String,
    /// Author date, as git printed it
    pub date: String,
}

fn lines(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect()
}

/// Check whether `repo` is inside a git repository
pub fn is_git_repo(repo: &Path) -> bool {
    run_git(repo, &["rev-parse", "--git-dir"])
        .map(|o| o.success)
        .unwrap_or(false)
}

/// Get the current branch name, if any
pub fn current_branch(repo: &Path) -> Option<String> {
    let output = run_git(repo, &["branch", "--show-current"]).ok()?;
    let branch = output.stdout.trim();
    (output.success && !branch.is_empty()).then(|| branch.to_string())
}

/// Collect a comprehensive repository status
pub fn status(repo: &Path) -> GitStatus {
    if !is_git_repo(repo) {
        return GitStatus::default();
    }

    let mut status = GitStatus {
        is_repo: true,
        branch: current_branch(repo),
        ..GitStatus::default()
    };

    if let Ok(o) = run_git(repo, &["diff", "--cached", "--name-only"]) {
        if o.success {
            status.staged_files = lines(&o.stdout);
        }
    }

    if let Ok(o) = run_git(repo, &["diff", "--name-only"]) {
        if o.success {
            status.unstaged_files = lines(&o.stdout);
        }
    }

    if let Ok(o) = run_git(repo, &["ls-files", "--others", "--exclude-standard"]) {
        if o.success {
            status.untracked_files = lines(&o.stdout);
        }
    }

    // No upstream is normal; leave ahead/behind at zero
    if let Ok(o) = run_git(repo, &["rev-list", "--left-right", "--count", "HEAD...@{u}"]) {
        if o.success {
            let parts: Vec<&str> = o.stdout.trim().split('\t').collect();
            if parts.len() == 2 {
                status.ahead = parts[0].parse().unwrap_or(0);
                status.behind = parts[1].parse().unwrap_or(0);
            }
        }
    }

    status
}

fn diff_output(repo: &Path, args: &[&str]) -> Option<String> {
    let output = run_git(repo, args).ok()?;
    (output.success && !output.stdout.trim().is_empty()).then_some(output.stdout)
}

/// Diff of staged changes
pub fn staged_diff(repo: &Path) -> Option<String> {
    diff_output(repo, &["diff", "--cached"])
}

/// Diff of unstaged changes
pub fn unstaged_diff(repo: &Path) -> Option<String> {
    diff_output(repo, &["diff"])
}

/// Combined diff of staged and unstaged changes
pub fn combined_diff(repo: &Path) -> Option<String> {
    let staged = staged_diff(repo).unwrap_or_default();
    let unstaged = unstaged_diff(repo).unwrap_or_default();

    let mut combined = staged;
    if !unstaged.is_empty() {
        if !combined.is_empty() {
            combined.push_str("\n\n");
        }
        combined.push_str(&unstaged);
    }

    (!combined.is_empty()).then_some(combined)
}

/// Candidate base refs tried in order when the requested base is missing
fn base_candidates(base_branch: &str) -> Vec<String> {
    vec![
        base_branch.to_string(),
        "master".to_string(),
        "origin/main".to_string(),
        "origin/master".to_string(),
    ]
}

/// Commit history from the base branch to HEAD, newest first
pub fn commit_history(repo: &Path, base_branch: &str, limit: usize) -> Vec<Commit> {
    for base in base_candidates(base_branch) {
        let range = format!("{base}..HEAD");
        let count = format!("-{limit}");
        let Ok(output) = run_git(
            repo,
            &["log", &range, "--pretty=format:%H|%s|%an|%ae|%ad", &count],
        ) else {
            return Vec::new();
        };

        if output.success && !output.stdout.trim().is_empty() {
            return output
                .stdout
                .lines()
                .filter_map(|line| {
                    let parts: Vec<&str> = line.splitn(5, '|').collect();
                    (parts.len() == 5).then(|| Commit {
                        hash: parts[0].to_string(),
                        subject: parts[1].to_string(),
                        author: parts[2].to_string(),
                        email: parts[3].to_string(),
                        date: parts[4].to_string(),
                    })
                })
                .collect();
        }
    }

    Vec::new()
}

/// Diff from the base branch to HEAD
pub fn branch_diff(repo: &Path, base_branch: &str) -> Option<String> {
    for base in base_candidates(base_branch) {
        let range = format!("{base}...HEAD");
        if let Ok(output) = run_git(repo, &["diff", &range]) {
            if output.success {
                let stdout = output.stdout;
                return (!stdout.trim().is_empty()).then_some(stdout);
            }
        }
    }
    None
}

/// Stage all changes (`git add .`)
pub fn stage_all(repo: &Path) -> bool {
    run_git(repo, &["add", "."]).map(|o| o.success).unwrap_or(false)
}

/// Create a commit with the given message. Returns success and the
/// combined git output.
pub fn create_commit(repo: &Path, message: &str, allow_empty: bool) -> (bool, String) {
    let mut args = vec!["commit", "-m", message];
    if allow_empty {
        args.push("--allow-empty");
    }

    match run_git(repo, &args) {
        Ok(o) => (o.success, format!("{}{}", o.stdout, o.stderr)),
        Err(e) => (false, e.to_string()),
    }
}
