//! Cost profiles: per-session records of tracked model calls

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Categories of model operations for cost attribution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OperationType {
    /// Grep-style content search
    #[serde(rename = "search:grep")]
    SearchGrep,
    /// Glob-style path search
    #[serde(rename = "search:glob")]
    SearchGlob,
    /// Reading a file
    #[serde(rename = "read:file")]
    ReadFile,
    /// Reading assembled context
    #[serde(rename = "read:context")]
    ReadContext,
    /// Generating new code
    #[serde(rename = "generation:code")]
    GenerationCode,
    /// Generating an edit
    #[serde(rename = "generation:edit")]
    GenerationEdit,
    /// Explaining code or behavior
    #[serde(rename = "explanation")]
    Explanation,
    /// Planning work
    #[serde(rename = "planning")]
    Planning,
    /// Delegated research agent
    #[serde(rename = "agent:research")]
    AgentResearch,
    /// Delegated exploration agent
    #[serde(rename = "agent:exploration")]
    AgentExploration,
    /// Guard-rails agent
    #[serde(rename = "agent:rails")]
    AgentRails,
    /// Agent bookkeeping overhead
    #[serde(rename = "agent:overhead")]
    AgentOverhead,
    /// Request routing
    #[serde(rename = "system:routing")]
    SystemRouting,
    /// Result synthesis
    #[serde(rename = "system:synthesis")]
    SystemSynthesis,
    /// Error recovery
    #[serde(rename = "system:error_recovery")]
    SystemErrorRecovery,
    /// Unattributed
    #[serde(rename = "unknown")]
    #[default]
    Unknown,
}

impl OperationType {
    /// Wire string used in profiles and reports
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationType::SearchGrep => "search:grep",
            OperationType::SearchGlob => "search:glob",
            OperationType::ReadFile => "read:file",
            OperationType::ReadContext => "read:context",
            OperationType::GenerationCode => "generation:code",
            OperationType::GenerationEdit => "generation:edit",
            OperationType::Explanation => "explanation",
            OperationType::Planning => "planning",
            OperationType::AgentResearch => "agent:research",
            OperationType::AgentExploration => "agent:exploration",
            OperationType::AgentRails => "agent:rails",
            OperationType::AgentOverhead => "agent:overhead",
            OperationType::SystemRouting => "system:routing",
            OperationType::SystemSynthesis => "system:synthesis",
            OperationType::SystemErrorRecovery => "system:error_recovery",
            OperationType::Unknown => "unknown",
        }
    }
}

/// A single tracked model call with full metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackedCall {
    /// When the call happened
    pub timestamp: DateTime<Utc>,
    /// Model identifier
    pub model: String,
    /// Operation category for cost attribution
    pub operation_type: OperationType,
    /// Input tokens
    pub input_tokens: u64,
    /// Output tokens
    pub output_tokens: u64,
    /// Cache-read tokens
    #[serde(default)]
    pub cache_read_tokens: u64,
    /// Cache-write tokens
    #[serde(default)]
    pub cache_write_tokens: u64,
    /// Cost in USD
    pub cost: f64,
    /// Delegated agent, if any (`None` = main conversation)
    #[serde(default)]
    pub agent_name: Option<String>,
    /// Tool in flight, if any
    #[serde(default)]
    pub tool_name: Option<String>,
    /// Free-form extra metadata
    #[serde(default)]
    pub metadata: serde_json::Value,
}

/// Aggregated cost profile for a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostProfile {
    /// Short session identifier
    pub session_id: String,
    /// When the session started
    pub start_time: DateTime<Utc>,
    /// All tracked calls
    #[serde(default)]
    pub calls: Vec<TrackedCall>,
    /// Path -> read count, for duplicate-read detection
    #[serde(default)]
    pub files_read: HashMap<String, u32>,
}

impl CostProfile {
    /// Create an empty profile starting now
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            start_time: Utc::now(),
            calls: Vec::new(),
            files_read: HashMap::new(),
        }
    }

    /// Add a tracked call
    pub fn add_call(&mut self, call: TrackedCall) {
        self.calls.push(call);
    }

    /// Record a file read for duplicate detection
    pub fn record_file_read(&mut self, path: &str) {
        *self.files_read.entry(path.to_string()).or_insert(0) += 1;
    }

    /// Total cost of all calls. Folded from an explicit 0.0 so an empty
    /// profile reports positive zero.
    pub fn total_cost(&self) -> f64 {
        self.calls.iter().fold(0.0, |acc, c| acc + c.cost)
    }

    /// Total input tokens
    pub fn total_input_tokens(&self) -> u64 {
        self.calls.iter().map(|c| c.input_tokens).sum()
    }

    /// Total output tokens
    pub fn total_output_tokens(&self) -> u64 {
        self.calls.iter().map(|c| c.output_tokens).sum()
    }

    /// Total cache-read tokens
    pub fn total_cache_read(&self) -> u64 {
        self.calls.iter().map(|c| c.cache_read_tokens).sum()
    }

    /// Total cache-write tokens
    pub fn total_cache_write(&self) -> u64 {
        self.calls.iter().map(|c| c.cache_write_tokens).sum()
    }

    fn breakdown(&self, key: impl Fn(&TrackedCall) -> String) -> Vec<(String, f64)> {
        let mut by_key: HashMap<String, f64> = HashMap::new();
        for call in &self.calls {
            *by_key.entry(key(call)).or_insert(0.0) += call.cost;
        }

        let mut sorted: Vec<_> = by_key.into_iter().collect();
        sorted.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        sorted
    }

    /// Cost breakdown by operation type, descending
    pub fn cost_by_operation(&self) -> Vec<(String, f64)> {
        self.breakdown(|c| c.operation_type.as_str().to_string())
    }

    /// Cost breakdown by model, descending
    pub fn cost_by_model(&self) -> Vec<(String, f64)> {
        self.breakdown(|c| c.model.clone())
    }

    /// Cost breakdown by agent, descending (`main` = no agent)
    pub fn cost_by_agent(&self) -> Vec<(String, f64)> {
        self.breakdown(|c| c.agent_name.clone().unwrap_or_else(|| "main".to_string()))
    }

    /// Files read more than once, sorted by count descending
    pub fn duplicate_file_reads(&self) -> Vec<(String, u32)> {
        let mut duplicates: Vec<_> = self
            .files_read
            .iter()
            .filter(|(_, &count)| count > 1)
            .map(|(path, &count)| (path.clone(), count))
            .collect();
        duplicates.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        duplicates
    }

    /// Save the profile as pretty-printed JSON, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {:?}", parent))?;
        }

        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).with_context(|| format!("Failed to write {:?}", path))?;
        tracing::debug!("Saved cost profile to {:?}", path);
        Ok(())
    }

    /// Load a profile from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let json =
            fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
        serde_json::from_str(&json).with_context(|| format!("Failed to parse {:?}", path))
    }
}
