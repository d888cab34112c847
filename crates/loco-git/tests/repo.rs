//! Tests against a real scratch repository

use std::fs;
use std::path::Path;

use loco_git::{
    combined_diff, commit_history, create_commit, current_branch, is_git_repo, run_git,
    stage_all, staged_diff, status, GitError,
};

/// Skip tests gracefully on machines without git
fn git_available() -> bool {
    match run_git(Path::new("."), &["--version"]) {
        Ok(o) => o.success,
        Err(GitError::GitNotFound) => false,
        Err(_) => false,
    }
}

fn init_repo(dir: &Path) {
    assert!(run_git(dir, &["init", "-q"]).unwrap().success);
    assert!(run_git(dir, &["config", "user.email", "dev@example.com"]).unwrap().success);
    assert!(run_git(dir, &["config", "user.name", "Dev"]).unwrap().success);
}

#[test]
fn detects_repo_and_branch() {
    if !git_available() {
        return;
    }

    let tmp = tempfile::tempdir().unwrap();
    assert!(!is_git_repo(tmp.path()));

    init_repo(tmp.path());
    assert!(is_git_repo(tmp.path()));

    let (ok, output) = create_commit(tmp.path(), "chore: initial commit", true);
    assert!(ok, "commit failed: {output}");

    // Branch name depends on init.defaultBranch; it just has to exist
    assert!(current_branch(tmp.path()).is_some());
}

#[test]
fn status_tracks_staged_and_untracked_files() {
    if !git_available() {
        return;
    }

    let tmp = tempfile::tempdir().unwrap();
    init_repo(tmp.path());
    create_commit(tmp.path(), "chore: initial commit", true);

    fs::write(tmp.path().join("new.txt"), "hello\n").unwrap();
    let before = status(tmp.path());
    assert!(before.is_repo);
    assert_eq!(before.untracked_files, vec!["new.txt"]);
    assert!(!before.has_staged_changes());

    assert!(stage_all(tmp.path()));
    let after = status(tmp.path());
    assert_eq!(after.staged_files, vec!["new.txt"]);
    assert!(after.has_changes());
}

#[test]
fn diffs_reflect_staged_changes() {
    if !git_available() {
        return;
    }

    let tmp = tempfile::tempdir().unwrap();
    init_repo(tmp.path());
    create_commit(tmp.path(), "chore: initial commit", true);

    assert!(staged_diff(tmp.path()).is_none());

    fs::write(tmp.path().join("a.txt"), "line one\n").unwrap();
    stage_all(tmp.path());

    let diff = staged_diff(tmp.path()).expect("staged diff should exist");
    assert!(diff.contains("line one"));
    assert!(combined_diff(tmp.path()).unwrap().contains("line one"));
}

#[test]
fn commit_history_walks_back_to_base() {
    if !git_available() {
        return;
    }

    let tmp = tempfile::tempdir().unwrap();
    init_repo(tmp.path());
    create_commit(tmp.path(), "chore: initial commit", true);

    // Branch off and add commits; history against the start point should
    // list only the branch commits, newest first
    let base = current_branch(tmp.path()).unwrap();
    assert!(run_git(tmp.path(), &["checkout", "-q", "-b", "feature"]).unwrap().success);
    create_commit(tmp.path(), "feat: first change", true);
    create_commit(tmp.path(), "feat: second change", true);

    let history = commit_history(tmp.path(), &base, 50);
    let subjects: Vec<_> = history.iter().map(|c| c.subject.as_str()).collect();
    assert_eq!(subjects, vec!["feat: second change", "feat: first change"]);
    assert_eq!(history[0].author, "Dev");
}
