//! Agent definition and parsing
//!
//! Agents are single markdown files under `<root>/agents/`, one file per
//! agent, with the same frontmatter convention as skills. The body is the
//! agent's system prompt.

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::layer::LayerKind;
use crate::manifest::{parse_front_matter, validate_description, validate_name};

/// Agent metadata extracted from YAML frontmatter
#[derive(Debug, Clone, Deserialize)]
pub struct AgentMetadata {
    /// Agent name (lowercase letters/numbers/hyphens only)
    pub name: String,
    /// What this agent does and when to delegate to it
    pub description: String,
    /// Comma-separated tool names the agent may use (e.g. "read, grep")
    #[serde(default)]
    pub tools: Option<String>,
}

/// A discovered agent: immutable snapshot taken at discovery time
#[derive(Debug, Clone)]
pub struct Agent {
    /// Agent metadata
    pub metadata: AgentMetadata,
    /// Full path to the agent's manifest file
    pub path: PathBuf,
    /// Which layer this agent was found in, for diagnostics
    pub source: LayerKind,
    /// Markdown body: the agent's system prompt
    pub system_prompt: String,
}

impl Agent {
    /// Load an agent from a `.md` manifest file
    pub fn from_file(path: &Path, source: LayerKind) -> Result<Self> {
        if !path.is_file() {
            return Err(anyhow!("Agent manifest not found: {:?}", path));
        }

        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;

        let (metadata, body): (AgentMetadata, String) = parse_front_matter(&content)
            .with_context(|| format!("Failed to parse agent from {:?}", path))?;

        validate_name(&metadata.name)?;
        validate_description(&metadata.name, &metadata.description)?;

        Ok(Self {
            metadata,
            path: path.to_path_buf(),
            source,
            system_prompt: body,
        })
    }

    /// Get the agent name
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// Get the agent description
    pub fn description(&self) -> &str {
        &self.metadata.description
    }

    /// Tool names parsed from the comma-separated `tools` field.
    /// Empty when the agent declares no restriction.
    pub fn tools(&self) -> Vec<String> {
        self.metadata
            .tools
            .as_deref()
            .unwrap_or("")
            .split(',')
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect()
    }

    /// Generate a concise summary for the model system prompt
    pub fn to_summary(&self) -> String {
        format!("- {}: {}", self.metadata.name, self.metadata.description)
    }
}
