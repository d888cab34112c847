//! Skill definition and parsing
//!
//! Each skill is a folder containing SKILL.md with YAML frontmatter

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::layer::LayerKind;
use crate::manifest::{parse_front_matter, validate_description, validate_name};

/// Skill metadata extracted from YAML frontmatter
#[derive(Debug, Clone, Deserialize)]
pub struct SkillMetadata {
    /// Skill name (lowercase letters/numbers/hyphens only)
    pub name: String,
    /// Skill description (describes WHAT and WHEN)
    pub description: String,
    /// Whether the user may invoke this skill directly (e.g. `/{name}`)
    #[serde(rename = "user-invocable", default)]
    pub user_invocable: bool,
    /// Tools this skill is allowed to use; empty means unrestricted
    #[serde(rename = "allowed-tools", default)]
    pub allowed_tools: Vec<String>,
}

/// A discovered skill: immutable snapshot taken at discovery time
#[derive(Debug, Clone)]
pub struct Skill {
    /// Skill metadata
    pub metadata: SkillMetadata,
    /// Full path to the skill directory
    pub path: PathBuf,
    /// Which layer this skill was found in, for diagnostics
    pub source: LayerKind,
    /// Full SKILL.md content
    pub content: String,
}

impl Skill {
    /// Load a skill from a directory containing SKILL.md
    pub fn from_dir(dir: &Path, source: LayerKind) -> Result<Self> {
        let skill_file = dir.join("SKILL.md");

        if !skill_file.exists() {
            return Err(anyhow!("SKILL.md not found in {:?}", dir));
        }

        let content = fs::read_to_string(&skill_file)
            .with_context(|| format!("Failed to read {:?}", skill_file))?;

        let (metadata, _body): (SkillMetadata, String) = parse_front_matter(&content)
            .with_context(|| format!("Failed to parse skill from {:?}", skill_file))?;

        validate_name(&metadata.name)?;
        validate_description(&metadata.name, &metadata.description)?;

        Ok(Self {
            metadata,
            path: dir.to_path_buf(),
            source,
            content,
        })
    }

    /// Get the skill name
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// Get the skill description
    pub fn description(&self) -> &str {
        &self.metadata.description
    }

    /// Generate a concise summary for the model system prompt
    /// Format: "- {name}: {description}"
    pub fn to_summary(&self) -> String {
        format!("- {}: {}", self.metadata.name, self.metadata.description)
    }
}
