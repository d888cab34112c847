//! Prompt templates for commit messages and PR descriptions
//!
//! These build the text handed to the external model runtime. Diff
//! content is embedded verbatim (truncated), never interpreted.

use crate::Commit;

/// Maximum diff length embedded in a commit message prompt
const MAX_COMMIT_DIFF_CHARS: usize = 5000;
/// Maximum diff lines sampled into a PR description prompt
const MAX_PR_DIFF_LINES: usize = 100;
/// Maximum commits listed in a PR description prompt
const MAX_PR_COMMITS: usize = 10;

const COMMIT_MESSAGE_PROMPT: &str = "Generate a conventional commit message for these changes.

Follow the conventional commits format:
<type>(<scope>): <subject>

[optional body]

[optional footer]

Types: feat, fix, docs, style, refactor, perf, test, chore, ci, build, revert

Rules:
- Subject line: max 50 chars, lowercase, no period
- Body: wrap at 72 chars, explain what and why
- Be specific and concise
- Focus on the intent, not the implementation details

Diff:
```
{diff}
```

Generate only the commit message, no explanation.";

const PR_DESCRIPTION_PROMPT: &str = "Generate a GitHub pull request description for this branch.

Branch: {branch}
Base: {base_branch}

Commits:
{commits}

Diff summary:
{diff_summary}

Generate a PR description with:
1. A clear title (one line summary)
2. ## Summary section - what and why
3. ## Changes section - bullet points of key changes
4. ## Testing section - how to test/verify

Use markdown formatting. Be concise but complete.";

/// Build the commit message generation prompt. Long diffs are truncated.
pub fn commit_message_prompt(diff: &str) -> String {
    let diff = if diff.len() > MAX_COMMIT_DIFF_CHARS {
        let mut end = MAX_COMMIT_DIFF_CHARS;
        while !diff.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}\n\n... (diff truncated)", &diff[..end])
    } else {
        diff.to_string()
    };

    COMMIT_MESSAGE_PROMPT.replace("{diff}", &diff)
}

/// Summarize a diff as "<files> files changed, +adds -dels lines"
pub fn summarize_diff(diff: &str) -> String {
    let mut files_changed = 0usize;
    let mut additions = 0usize;
    let mut deletions = 0usize;

    for line in diff.lines() {
        if line.starts_with("diff --git") {
            files_changed += 1;
        } else if line.starts_with('+') {
            additions += 1;
        } else if line.starts_with('-') {
            deletions += 1;
        }
    }

    format!("{files_changed} files changed, +{additions} -{deletions} lines")
}

/// Build the PR description generation prompt from branch metadata,
/// recent commits, and a sampled diff.
pub fn pr_description_prompt(
    branch: &str,
    base_branch: &str,
    commits: &[Commit],
    diff: &str,
) -> String {
    let commits_text: Vec<String> = commits
        .iter()
        .take(MAX_PR_COMMITS)
        .map(|c| {
            let short = &c.hash[..c.hash.len().min(7)];
            format!("- {} ({})", c.subject, short)
        })
        .collect();

    let diff_lines: Vec<&str> = diff.lines().collect();
    let mut sample = diff_lines
        .iter()
        .take(MAX_PR_DIFF_LINES)
        .copied()
        .collect::<Vec<_>>()
        .join("\n");
    if diff_lines.len() > MAX_PR_DIFF_LINES {
        sample.push_str("\n... (diff truncated)");
    }

    let diff_summary = format!("{}\n\n```\n{}\n```", summarize_diff(diff), sample);

    PR_DESCRIPTION_PROMPT
        .replace("{branch}", branch)
        .replace("{base_branch}", base_branch)
        .replace("{commits}", &commits_text.join("\n"))
        .replace("{diff_summary}", &diff_summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn commit(hash: &str, subject: &str) -> Commit {
        Commit {
            hash: hash.to_string(),
            subject: subject.to_string(),
            author: "Dev".to_string(),
            email: "dev@example.com".to_string(),
            date: "Mon Jan 1 00:00:00 2024".to_string(),
        }
    }

    #[test]
    fn test_commit_prompt_embeds_diff() {
        let prompt = commit_message_prompt("diff --git a/x b/x\n+added line\n");
        assert!(prompt.contains("+added line"));
        assert!(!prompt.contains("{diff}"));
    }

    #[test]
    fn test_commit_prompt_truncates_long_diff() {
        let diff = "x".repeat(6000);
        let prompt = commit_message_prompt(&diff);
        assert!(prompt.contains("... (diff truncated)"));
        assert!(prompt.len() < 6000);
    }

    #[test]
    fn test_summarize_diff_counts() {
        let diff = "diff --git a/f b/f\n--- a/f\n+++ b/f\n+one\n+two\n-gone\n";
        // +++ and --- headers count toward additions/deletions, as in the
        // crude line-prefix heuristic this mirrors
        assert_eq!(summarize_diff(diff), "1 files changed, +3 -2 lines");
    }

    #[test]
    fn test_pr_prompt_limits_commits() {
        let commits: Vec<Commit> = (0..15)
            .map(|i| commit(&format!("{i:040}"), &format!("commit {i}")))
            .collect();

        let prompt = pr_description_prompt("feature", "main", &commits, "");
        assert!(prompt.contains("commit 9"));
        assert!(!prompt.contains("commit 10"));
        assert!(prompt.contains("Branch: feature"));
        assert!(prompt.contains("Base: main"));
        assert!(prompt.ends_with("Use markdown formatting. Be concise but complete."));
    }

    #[test]
    fn test_pr_prompt_samples_diff() {
        let diff: String = (0..150).map(|i| format!("line {i}\n")).collect();
        let prompt = pr_description_prompt("b", "main", &[], &diff);
        assert!(prompt.contains("line 99"));
        assert!(!prompt.contains("line 120"));
        assert!(prompt.contains("... (diff truncated)"));
    }
}
