//! Hook execution
//!
//! Each hook runs as `sh -c <command>` with a JSON payload on stdin and
//! `LOCO_PROJECT_DIR` in its environment. Execution is sequential; a hook
//! that cannot be spawned or exceeds its timeout produces a failed result
//! rather than an error.

use serde::Deserialize;
use serde_json::{json, Value};
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::config::{Hook, HookEvent};

/// Context passed to a hook invocation
#[derive(Debug, Clone, Copy)]
pub struct HookInput<'a> {
    /// The lifecycle event that triggered the hook
    pub event: HookEvent,
    /// Tool name, for tool-use events
    pub tool_name: Option<&'a str>,
    /// Tool input, for tool-use events
    pub tool_input: Option<&'a Value>,
    /// Tool output, for post-tool-use events
    pub tool_output: Option<&'a str>,
    /// Project directory the hook runs in
    pub cwd: &'a Path,
}

/// Result from executing a single hook
#[derive(Debug, Clone, Default)]
pub struct HookResult {
    /// True when the command exited with code 0
    pub success: bool,
    /// Exit code; -1 for spawn failures and timeouts
    pub exit_code: i32,
    /// Captured stdout
    pub stdout: String,
    /// Captured stderr
    pub stderr: String,
    /// "allow", "deny", or "skip", parsed from JSON stdout
    pub decision: Option<String>,
    /// Reason accompanying the decision
    pub reason: Option<String>,
    /// Replacement tool input provided by the hook
    pub modified_input: Option<Value>,
    /// Extra context to append to the tool result
    pub additional_context: Option<String>,
}

impl HookResult {
    fn failure(stderr: impl Into<String>) -> Self {
        Self {
            success: false,
            exit_code: -1,
            stderr: stderr.into(),
            ..Self::default()
        }
    }
}

/// JSON structure a hook may print on stdout
#[derive(Debug, Deserialize)]
struct HookOutput {
    decision: Option<String>,
    reason: Option<String>,
    modified_input: Option<Value>,
    additional_context: Option<String>,
}

/// Outcome of the pre-tool-use hook chain
#[derive(Debug, Clone, Default)]
pub struct PreToolDecision {
    /// True when the tool may proceed
    pub allowed: bool,
    /// Reason for denial, when denied
    pub reason: Option<String>,
    /// Replacement tool input; last hook to provide one wins
    pub modified_input: Option<Value>,
}

fn build_payload(input: &HookInput<'_>) -> Value {
    let mut payload = json!({
        "hook_event": input.event.as_str(),
        "cwd": input.cwd.display().to_string(),
    });

    if let Some(name) = input.tool_name {
        payload["tool_name"] = json!(name);
    }
    if let Some(tool_input) = input.tool_input {
        payload["tool_input"] = tool_input.clone();
    }
    if let Some(output) = input.tool_output {
        payload["tool_output"] = json!(output);
    }

    payload
}

/// Execute a single hook and return its result.
pub async fn execute_hook(hook: &Hook, input: &HookInput<'_>) -> HookResult {
    let payload = build_payload(input).to_string();

    let mut child = match Command::new("sh")
        .arg("-c")
        .arg(&hook.command)
        .current_dir(input.cwd)
        .env("LOCO_PROJECT_DIR", input.cwd)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
    {
        Ok(child) => child,
        Err(e) => {
            warn!("Failed to spawn hook '{}': {}", hook.command, e);
            return HookResult::failure(e.to_string());
        }
    };

    if let Some(mut stdin) = child.stdin.take() {
        if let Err(e) = stdin.write_all(payload.as_bytes()).await {
            debug!("Failed to write hook stdin: {}", e);
        }
        // Closing stdin lets hooks that read to EOF proceed
        drop(stdin);
    }

    let output = match timeout(
        Duration::from_secs(hook.timeout_secs),
        child.wait_with_output(),
    )
    .await
    {
        Ok(Ok(output)) => output,
        Ok(Err(e)) => return HookResult::failure(e.to_string()),
        Err(_) => {
            return HookResult::failure(format!(
                "Hook timed out after {} seconds",
                hook.timeout_secs
            ));
        }
    };

    let exit_code = output.status.code().unwrap_or(-1);
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    let mut result = HookResult {
        success: exit_code == 0,
        exit_code,
        stdout,
        stderr,
        ..HookResult::default()
    };

    // Only successful hooks get their stdout interpreted; non-JSON output
    // is allowed and ignored
    if result.success && !result.stdout.trim().is_empty() {
        if let Ok(parsed) = serde_json::from_str::<HookOutput>(&result.stdout) {
            result.decision = parsed.decision;
            result.reason = parsed.reason;
            result.modified_input = parsed.modified_input;
            result.additional_context = parsed.additional_context;
        }
    }

    result
}

/// Execute hooks sequentially and collect every result.
pub async fn execute_hooks(hooks: &[&Hook], input: &HookInput<'_>) -> Vec<HookResult> {
    let mut results = Vec::with_capacity(hooks.len());
    for hook in hooks {
        results.push(execute_hook(hook, input).await);
    }
    results
}

/// Run the pre-tool-use chain and decide whether the tool may proceed.
///
/// A `decision: "deny"` or an exit code of 2 blocks the tool. All hooks
/// still run; the first deny wins, and the last `modified_input` wins.
pub async fn check_pre_tool_hooks(
    hooks: &[&Hook],
    tool_name: &str,
    tool_input: &Value,
    cwd: &Path,
) -> PreToolDecision {
    let input = HookInput {
        event: HookEvent::PreToolUse,
        tool_name: Some(tool_name),
        tool_input: Some(tool_input),
        tool_output: None,
        cwd,
    };

    let results = execute_hooks(hooks, &input).await;
    let mut modified_input = None;

    for result in results {
        if result.decision.as_deref() == Some("deny") {
            let reason = result.reason.or_else(|| {
                let stderr = result.stderr.trim();
                (!stderr.is_empty()).then(|| stderr.to_string())
            });
            return PreToolDecision {
                allowed: false,
                reason,
                modified_input: None,
            };
        }

        if result.exit_code == 2 {
            let stderr = result.stderr.trim();
            let reason = if stderr.is_empty() {
                "Hook blocked execution".to_string()
            } else {
                stderr.to_string()
            };
            return PreToolDecision {
                allowed: false,
                reason: Some(reason),
                modified_input: None,
            };
        }

        if result.modified_input.is_some() {
            modified_input = result.modified_input;
        }
    }

    PreToolDecision {
        allowed: true,
        reason: None,
        modified_input,
    }
}

/// Run the post-tool-use chain and gather extra context for the tool
/// result. Failed hooks contribute their stderr as a warning line.
pub async fn run_post_tool_hooks(
    hooks: &[&Hook],
    tool_name: &str,
    tool_input: &Value,
    tool_output: &str,
    cwd: &Path,
) -> Option<String> {
    let input = HookInput {
        event: HookEvent::PostToolUse,
        tool_name: Some(tool_name),
        tool_input: Some(tool_input),
        tool_output: Some(tool_output),
        cwd,
    };

    let results = execute_hooks(hooks, &input).await;
    let mut parts = Vec::new();

    for result in results {
        if let Some(context) = result.additional_context {
            parts.push(context);
        } else if !result.success && !result.stderr.trim().is_empty() {
            parts.push(format!("[Hook warning: {}]", result.stderr.trim()));
        }
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_input(cwd: &Path) -> HookInput<'_> {
        HookInput {
            event: HookEvent::SessionStart,
            tool_name: None,
            tool_input: None,
            tool_output: None,
            cwd,
        }
    }

    #[tokio::test]
    async fn test_hook_receives_payload_on_stdin() {
        let tmp = tempfile::tempdir().unwrap();
        let hook = Hook::new("cat");

        let result = execute_hook(&hook, &session_input(tmp.path())).await;
        assert!(result.success);
        assert!(result.stdout.contains("\"hook_event\":\"SessionStart\""));
    }

    #[tokio::test]
    async fn test_deny_decision_blocks_tool() {
        let tmp = tempfile::tempdir().unwrap();
        let hook = Hook::new(r#"echo '{"decision": "deny", "reason": "not allowed"}'"#);

        let decision =
            check_pre_tool_hooks(&[&hook], "bash", &json!({"command": "rm"}), tmp.path()).await;
        assert!(!decision.allowed);
        assert_eq!(decision.reason.as_deref(), Some("not allowed"));
    }

    #[tokio::test]
    async fn test_exit_code_two_blocks_tool() {
        let tmp = tempfile::tempdir().unwrap();
        let hook = Hook::new("echo nope >&2; exit 2");

        let decision = check_pre_tool_hooks(&[&hook], "bash", &json!({}), tmp.path()).await;
        assert!(!decision.allowed);
        assert_eq!(decision.reason.as_deref(), Some("nope"));
    }

    #[tokio::test]
    async fn test_modified_input_last_wins() {
        let tmp = tempfile::tempdir().unwrap();
        let first = Hook::new(r#"echo '{"modified_input": {"v": 1}}'"#);
        let second = Hook::new(r#"echo '{"modified_input": {"v": 2}}'"#);

        let decision =
            check_pre_tool_hooks(&[&first, &second], "edit", &json!({}), tmp.path()).await;
        assert!(decision.allowed);
        assert_eq!(decision.modified_input, Some(json!({"v": 2})));
    }

    #[tokio::test]
    async fn test_post_hooks_collect_context_and_warnings() {
        let tmp = tempfile::tempdir().unwrap();
        let ok = Hook::new(r#"echo '{"additional_context": "file was formatted"}'"#);
        let failing = Hook::new("echo boom >&2; exit 1");

        let context =
            run_post_tool_hooks(&[&ok, &failing], "edit", &json!({}), "output", tmp.path())
                .await
                .unwrap();
        assert!(context.contains("file was formatted"));
        assert!(context.contains("[Hook warning: boom]"));
    }

    #[tokio::test]
    async fn test_timeout_yields_failed_result() {
        let tmp = tempfile::tempdir().unwrap();
        let hook = Hook {
            command: "sleep 5".into(),
            timeout_secs: 1,
            matcher: None,
        };

        let result = execute_hook(&hook, &session_input(tmp.path())).await;
        assert!(!result.success);
        assert_eq!(result.exit_code, -1);
        assert!(result.stderr.contains("timed out"));
    }

    #[tokio::test]
    async fn test_spawn_never_panics_on_missing_cwd() {
        let hook = Hook::new("true");
        let missing = Path::new("/definitely/not/a/real/dir");

        let result = execute_hook(&hook, &session_input(missing)).await;
        assert!(!result.success);
    }

    #[tokio::test]
    async fn test_non_json_stdout_is_ignored() {
        let tmp = tempfile::tempdir().unwrap();
        let hook = Hook::new("echo plain text");

        let result = execute_hook(&hook, &session_input(tmp.path())).await;
        assert!(result.success);
        assert!(result.decision.is_none());
        assert!(result.additional_context.is_none());
    }
}
