//! Loco lifecycle hooks
//!
//! Hooks are shell commands configured in `settings.json` under the same
//! layer roots as skills and agents. Each hook receives a JSON payload on
//! stdin describing the event and may answer with JSON on stdout:
//!
//! - exit code 0: success; stdout may carry `decision`, `reason`,
//!   `modified_input`, `additional_context`
//! - exit code 2: blocking error; stderr is shown to the user
//! - any other exit code: non-blocking error
//!
//! Hook failures never abort the host; a hook that cannot be spawned or
//! times out yields a failed [`HookResult`].

pub mod config;
pub mod exec;

pub use config::{Hook, HookConfig, HookEvent};
pub use exec::{
    check_pre_tool_hooks, execute_hook, execute_hooks, run_post_tool_hooks, HookInput,
    HookResult, PreToolDecision,
};
