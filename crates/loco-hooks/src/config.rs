//! Hook configuration loaded from layered `settings.json` files

use anyhow::{Context, Result};
use regex::RegexBuilder;
use serde::Deserialize;
use std::fs;
use tracing::{debug, warn};

use loco_skills::LayerSet;

const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Lifecycle events where hooks can run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookEvent {
    /// Before a tool runs; may deny or modify the tool input
    PreToolUse,
    /// After a tool ran; may contribute additional context
    PostToolUse,
    /// When a session starts
    SessionStart,
    /// When a session ends
    SessionEnd,
}

impl HookEvent {
    /// Wire name used in settings files and hook payloads
    pub fn as_str(&self) -> &'static str {
        match self {
            HookEvent::PreToolUse => "PreToolUse",
            HookEvent::PostToolUse => "PostToolUse",
            HookEvent::SessionStart => "SessionStart",
            HookEvent::SessionEnd => "SessionEnd",
        }
    }
}

/// A single hook definition
#[derive(Debug, Clone)]
pub struct Hook {
    /// Shell command to execute
    pub command: String,
    /// Wall-clock limit for the command, in seconds
    pub timeout_secs: u64,
    /// Regex matched against tool names; `None` matches every tool
    pub matcher: Option<String>,
}

impl Hook {
    /// Build a hook from a bare command string with default timeout
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            matcher: None,
        }
    }

    /// Check whether this hook applies to the given tool name.
    ///
    /// The matcher is tried as a case-insensitive anchored regex; if it
    /// fails to compile it falls back to case-insensitive equality.
    pub fn matches(&self, tool_name: &str) -> bool {
        let Some(matcher) = &self.matcher else {
            return true;
        };

        match RegexBuilder::new(matcher).case_insensitive(true).build() {
            Ok(re) => re
                .find(tool_name)
                .map(|m| m.start() == 0)
                .unwrap_or(false),
            Err(_) => matcher.eq_ignore_ascii_case(tool_name),
        }
    }
}

// Wire shapes for the flexible settings format. An event's hook list mixes
// bare command strings with matcher groups:
//
// {
//   "hooks": {
//     "PreToolUse": [
//       "check-style.sh",
//       {"matcher": "bash", "hooks": [{"type": "command", "command": "guard.sh", "timeout": 10}]}
//     ]
//   }
// }
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum HookEntry {
    Command(String),
    Group {
        #[serde(default)]
        matcher: Option<String>,
        #[serde(default)]
        hooks: Vec<HookDef>,
    },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum HookDef {
    Command(String),
    Full {
        #[serde(rename = "type")]
        kind: String,
        #[serde(default)]
        command: String,
        #[serde(default)]
        timeout: Option<u64>,
    },
}

#[derive(Debug, Deserialize, Default)]
struct RawHooks {
    #[serde(rename = "PreToolUse", default)]
    pre_tool_use: Vec<HookEntry>,
    #[serde(rename = "PostToolUse", default)]
    post_tool_use: Vec<HookEntry>,
    #[serde(rename = "SessionStart", default)]
    session_start: Vec<HookEntry>,
    #[serde(rename = "SessionEnd", default)]
    session_end: Vec<HookEntry>,
}

#[derive(Debug, Deserialize, Default)]
struct RawSettings {
    #[serde(default)]
    hooks: RawHooks,
}

/// Configuration for all hooks, grouped by event
#[derive(Debug, Clone, Default)]
pub struct HookConfig {
    /// Hooks run before tool use
    pub pre_tool_use: Vec<Hook>,
    /// Hooks run after tool use
    pub post_tool_use: Vec<Hook>,
    /// Hooks run at session start
    pub session_start: Vec<Hook>,
    /// Hooks run at session end
    pub session_end: Vec<Hook>,
}

impl HookConfig {
    /// Parse a single settings document (the full `settings.json` value).
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawSettings = serde_json::from_str(json).context("Failed to parse settings")?;

        Ok(Self {
            pre_tool_use: flatten(raw.hooks.pre_tool_use),
            post_tool_use: flatten(raw.hooks.post_tool_use),
            session_start: flatten(raw.hooks.session_start),
            session_end: flatten(raw.hooks.session_end),
        })
    }

    /// Load hook configuration from `settings.json` across the discovery
    /// layers, concatenating per-event lists in layer order. Hooks from
    /// every layer run; unlike named registry entries there is no
    /// override by key. Missing or malformed settings files are skipped
    /// with a warning.
    pub fn load(layers: &LayerSet) -> Self {
        let mut merged = Self::default();

        for layer in layers.iter() {
            let path = layer.root.join("settings.json");
            let json = match fs::read_to_string(&path) {
                Ok(json) => json,
                Err(_) => {
                    debug!("No settings file in {} layer", layer.kind);
                    continue;
                }
            };

            match Self::from_json(&json) {
                Ok(config) => merged.extend(config),
                Err(e) => warn!("Skipping settings at {:?}: {:#}", path, e),
            }
        }

        merged
    }

    /// Append another config's hooks after this one's
    pub fn extend(&mut self, other: Self) {
        self.pre_tool_use.extend(other.pre_tool_use);
        self.post_tool_use.extend(other.post_tool_use);
        self.session_start.extend(other.session_start);
        self.session_end.extend(other.session_end);
    }

    /// Hooks for an event, optionally filtered by tool name
    pub fn hooks_for(&self, event: HookEvent, tool_name: Option<&str>) -> Vec<&Hook> {
        let hooks = match event {
            HookEvent::PreToolUse => &self.pre_tool_use,
            HookEvent::PostToolUse => &self.post_tool_use,
            HookEvent::SessionStart => &self.session_start,
            HookEvent::SessionEnd => &self.session_end,
        };

        hooks
            .iter()
            .filter(|h| tool_name.map_or(true, |name| h.matches(name)))
            .collect()
    }

    /// True when no hooks are configured for any event
    pub fn is_empty(&self) -> bool {
        self.pre_tool_use.is_empty()
            && self.post_tool_use.is_empty()
            && self.session_start.is_empty()
            && self.session_end.is_empty()
    }
}

fn flatten(entries: Vec<HookEntry>) -> Vec<Hook> {
    let mut hooks = Vec::new();

    for entry in entries {
        match entry {
            HookEntry::Command(command) => hooks.push(Hook::new(command)),
            HookEntry::Group { matcher, hooks: members } => {
                for member in members {
                    match member {
                        HookDef::Command(command) => hooks.push(Hook {
                            command,
                            timeout_secs: DEFAULT_TIMEOUT_SECS,
                            matcher: matcher.clone(),
                        }),
                        HookDef::Full { kind, command, timeout } => {
                            if kind != "command" {
                                warn!("Ignoring hook with unsupported type '{}'", kind);
                                continue;
                            }
                            hooks.push(Hook {
                                command,
                                timeout_secs: timeout.unwrap_or(DEFAULT_TIMEOUT_SECS),
                                matcher: matcher.clone(),
                            });
                        }
                    }
                }
            }
        }
    }

    hooks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_command() {
        let config = HookConfig::from_json(r#"{"hooks": {"SessionStart": ["echo hi"]}}"#).unwrap();
        assert_eq!(config.session_start.len(), 1);
        assert_eq!(config.session_start[0].command, "echo hi");
        assert_eq!(config.session_start[0].timeout_secs, 60);
        assert!(config.session_start[0].matcher.is_none());
    }

    #[test]
    fn test_parse_matcher_group() {
        let json = r#"{
            "hooks": {
                "PreToolUse": [
                    {
                        "matcher": "bash",
                        "hooks": [{"type": "command", "command": "guard.sh", "timeout": 10}]
                    }
                ]
            }
        }"#;

        let config = HookConfig::from_json(json).unwrap();
        assert_eq!(config.pre_tool_use.len(), 1);
        let hook = &config.pre_tool_use[0];
        assert_eq!(hook.command, "guard.sh");
        assert_eq!(hook.timeout_secs, 10);
        assert_eq!(hook.matcher.as_deref(), Some("bash"));
    }

    #[test]
    fn test_unsupported_hook_type_is_ignored() {
        let json = r#"{
            "hooks": {
                "PostToolUse": [
                    {"hooks": [{"type": "webhook", "command": "x"}, "fmt.sh"]}
                ]
            }
        }"#;

        let config = HookConfig::from_json(json).unwrap();
        assert_eq!(config.post_tool_use.len(), 1);
        assert_eq!(config.post_tool_use[0].command, "fmt.sh");
    }

    #[test]
    fn test_matcher_regex_and_fallback() {
        let mut hook = Hook::new("x");
        assert!(hook.matches("anything"));

        hook.matcher = Some("bash|shell".into());
        assert!(hook.matches("Bash"));
        assert!(hook.matches("shell"));
        assert!(!hook.matches("read"));

        // Broken regex falls back to case-insensitive equality
        hook.matcher = Some("bash(".into());
        assert!(hook.matches("BASH("));
        assert!(!hook.matches("bash"));
    }

    #[test]
    fn test_hooks_for_filters_by_tool() {
        let json = r#"{
            "hooks": {
                "PreToolUse": [
                    {"matcher": "bash", "hooks": ["guard.sh"]},
                    "always.sh"
                ]
            }
        }"#;

        let config = HookConfig::from_json(json).unwrap();
        assert_eq!(config.hooks_for(HookEvent::PreToolUse, Some("bash")).len(), 2);
        assert_eq!(config.hooks_for(HookEvent::PreToolUse, Some("read")).len(), 1);
        assert_eq!(config.hooks_for(HookEvent::PreToolUse, None).len(), 2);
    }

    #[test]
    fn test_load_concatenates_layers() {
        use loco_skills::LayerSet;
        use std::fs;

        let tmp = tempfile::tempdir().unwrap();
        let claude = tmp.path().join(".claude");
        let loco = tmp.path().join(".loco");
        fs::create_dir_all(&claude).unwrap();
        fs::create_dir_all(&loco).unwrap();
        fs::write(
            claude.join("settings.json"),
            r#"{"hooks": {"SessionStart": ["from-claude.sh"]}}"#,
        )
        .unwrap();
        fs::write(
            loco.join("settings.json"),
            r#"{"hooks": {"SessionStart": ["from-loco.sh"]}}"#,
        )
        .unwrap();

        let layers = LayerSet::for_project(tmp.path(), None);
        let config = HookConfig::load(&layers);
        let commands: Vec<_> = config.session_start.iter().map(|h| h.command.as_str()).collect();
        assert_eq!(commands, vec!["from-claude.sh", "from-loco.sh"]);
    }

    #[test]
    fn test_load_skips_malformed_settings() {
        use loco_skills::LayerSet;
        use std::fs;

        let tmp = tempfile::tempdir().unwrap();
        let loco = tmp.path().join(".loco");
        fs::create_dir_all(&loco).unwrap();
        fs::write(loco.join("settings.json"), "{not json").unwrap();

        let layers = LayerSet::for_project(tmp.path(), None);
        let config = HookConfig::load(&layers);
        assert!(config.is_empty());
    }
}
