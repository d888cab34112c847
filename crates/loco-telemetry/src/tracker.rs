//! Explicit cost tracker owned by the session
//!
//! Replaces the usual global-singleton pattern: the caller constructs a
//! tracker, threads it through the session, and decides when to save.

use anyhow::Result;
use chrono::Utc;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::profile::{CostProfile, OperationType, TrackedCall};

fn short_session_id() -> String {
    Uuid::new_v4().to_string()[..8].to_string()
}

/// Tracks model calls and file reads for one session
#[derive(Debug, Default)]
pub struct CostTracker {
    enabled: bool,
    profile: Option<CostProfile>,
    current_operation: OperationType,
    current_agent: Option<String>,
    current_tool: Option<String>,
}

impl CostTracker {
    /// Create a disabled tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable tracking, creating a profile if none exists
    pub fn enable(&mut self) {
        self.enabled = true;
        if self.profile.is_none() {
            self.profile = Some(CostProfile::new(short_session_id()));
        }
    }

    /// Disable tracking; the profile is kept
    pub fn disable(&mut self) {
        self.enabled = false;
    }

    /// Check if tracking is enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// The current profile, if one was started
    pub fn profile(&self) -> Option<&CostProfile> {
        self.profile.as_ref()
    }

    /// Set the operation category attributed to subsequent calls
    pub fn set_operation(&mut self, operation: OperationType) {
        self.current_operation = operation;
    }

    /// Set the agent attributed to subsequent calls; `None` = main
    pub fn set_agent(&mut self, agent: Option<&str>) {
        self.current_agent = agent.map(String::from);
    }

    /// Set the tool attributed to subsequent calls
    pub fn set_tool(&mut self, tool: Option<&str>) {
        self.current_tool = tool.map(String::from);
    }

    /// Track a model call. A no-op when tracking is disabled.
    pub fn track_call(
        &mut self,
        model: &str,
        input_tokens: u64,
        output_tokens: u64,
        cost: f64,
        cache_read_tokens: u64,
        cache_write_tokens: u64,
    ) {
        if !self.enabled {
            return;
        }
        let Some(profile) = self.profile.as_mut() else {
            return;
        };

        profile.add_call(TrackedCall {
            timestamp: Utc::now(),
            model: model.to_string(),
            operation_type: self.current_operation,
            input_tokens,
            output_tokens,
            cache_read_tokens,
            cache_write_tokens,
            cost,
            agent_name: self.current_agent.clone(),
            tool_name: self.current_tool.clone(),
            metadata: serde_json::Value::Null,
        });
    }

    /// Track a file read for duplicate detection. A no-op when disabled.
    pub fn track_file_read(&mut self, path: &str) {
        if !self.enabled {
            return;
        }
        if let Some(profile) = self.profile.as_mut() {
            profile.record_file_read(path);
        }
    }

    /// Start a fresh profile for a new session
    pub fn reset(&mut self) {
        self.profile = Some(CostProfile::new(short_session_id()));
    }

    /// Save the current profile under `directory` as
    /// `profile_<session_id>.json`. Returns the written path, or `None`
    /// when no profile was started.
    pub fn save_profile(&self, directory: &Path) -> Result<Option<PathBuf>> {
        let Some(profile) = &self.profile else {
            return Ok(None);
        };

        let path = directory.join(format!("profile_{}.json", profile.session_id));
        profile.save(&path)?;
        Ok(Some(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_tracker_records_nothing() {
        let mut tracker = CostTracker::new();
        tracker.track_call("gpt-4o", 100, 50, 0.01, 0, 0);
        tracker.track_file_read("x.rs");
        assert!(tracker.profile().is_none());
    }

    #[test]
    fn test_enabled_tracker_attributes_scope() {
        let mut tracker = CostTracker::new();
        tracker.enable();
        tracker.set_operation(OperationType::AgentResearch);
        tracker.set_agent(Some("researcher"));
        tracker.set_tool(Some("grep"));
        tracker.track_call("gpt-4o", 100, 50, 0.01, 10, 5);

        let profile = tracker.profile().unwrap();
        assert_eq!(profile.calls.len(), 1);
        let call = &profile.calls[0];
        assert_eq!(call.operation_type, OperationType::AgentResearch);
        assert_eq!(call.agent_name.as_deref(), Some("researcher"));
        assert_eq!(call.tool_name.as_deref(), Some("grep"));
        assert_eq!(call.cache_read_tokens, 10);
    }

    #[test]
    fn test_reset_starts_new_session() {
        let mut tracker = CostTracker::new();
        tracker.enable();
        tracker.track_call("gpt-4o", 1, 1, 0.0, 0, 0);
        let first_id = tracker.profile().unwrap().session_id.clone();

        tracker.reset();
        let profile = tracker.profile().unwrap();
        assert!(profile.calls.is_empty());
        assert_ne!(profile.session_id, first_id);
    }

    #[test]
    fn test_save_profile_writes_file() {
        let tmp = tempfile::tempdir().unwrap();

        let tracker = CostTracker::new();
        assert!(tracker.save_profile(tmp.path()).unwrap().is_none());

        let mut tracker = CostTracker::new();
        tracker.enable();
        tracker.track_call("gpt-4o", 1, 1, 0.0, 0, 0);
        let path = tracker.save_profile(tmp.path()).unwrap().unwrap();
        assert!(path.exists());
        assert!(path.file_name().unwrap().to_str().unwrap().starts_with("profile_"));
    }
}
