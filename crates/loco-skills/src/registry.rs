//! Skill and agent registries
//!
//! A registry is a name-to-entry map built fresh per `discover` call by
//! folding the layer roots in precedence order. Later layers overwrite
//! earlier ones by name; within one layer entries are visited in
//! lexicographic file-name order so the result never depends on
//! filesystem iteration order.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::agent::Agent;
use crate::layer::LayerSet;
use crate::skill::Skill;

/// Registry of discovered skills, keyed by frontmatter name
#[derive(Debug, Default)]
pub struct SkillRegistry {
    skills: HashMap<String, Skill>,
}

impl SkillRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the registry from the given layers.
    ///
    /// Any previous contents are discarded first, so removing a manifest
    /// on disk and re-discovering drops the entry. Malformed manifests
    /// are skipped with a warning; a missing `skills/` directory in a
    /// layer contributes nothing. Nothing here is fatal.
    pub fn discover(&mut self, layers: &LayerSet) {
        self.skills.clear();

        info!("Starting skill discovery across {} layers", layers.len());

        for layer in layers.iter() {
            let dir = layer.root.join("skills");
            for path in sorted_entries(&dir, |p| p.is_dir()) {
                match Skill::from_dir(&path, layer.kind) {
                    Ok(skill) => {
                        let name = skill.name().to_string();
                        debug!("Discovered skill '{}' in {} layer", name, layer.kind);
                        self.skills.insert(name, skill);
                    }
                    Err(e) => {
                        warn!("Skipping skill manifest at {:?}: {:#}", path, e);
                    }
                }
            }
        }

        info!("Discovered {} skills", self.skills.len());
    }

    /// Get a skill by name
    pub fn get(&self, name: &str) -> Option<&Skill> {
        self.skills.get(name)
    }

    /// All skills, sorted by name
    pub fn get_all(&self) -> Vec<&Skill> {
        let mut all: Vec<_> = self.skills.values().collect();
        all.sort_by_key(|s| s.name().to_string());
        all
    }

    /// Number of skills
    pub fn len(&self) -> usize {
        self.skills.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    /// Generate the skills section of the model system prompt.
    /// Empty when no skills are available.
    pub fn generate_system_prompt(&self) -> String {
        if self.skills.is_empty() {
            return String::new();
        }

        let mut prompt = String::from("\n\nAvailable skills (use /{skill-name} to activate):\n");
        for skill in self.get_all() {
            prompt.push_str(&skill.to_summary());
            prompt.push('\n');
        }

        prompt
    }
}

/// Registry of discovered agents, keyed by frontmatter name
#[derive(Debug, Default)]
pub struct AgentRegistry {
    agents: HashMap<String, Agent>,
}

impl AgentRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the registry from the given layers.
    ///
    /// Same semantics as [`SkillRegistry::discover`]: fresh build, sorted
    /// per-layer scan of `<root>/agents/*.md`, later layers override.
    pub fn discover(&mut self, layers: &LayerSet) {
        self.agents.clear();

        info!("Starting agent discovery across {} layers", layers.len());

        for layer in layers.iter() {
            let dir = layer.root.join("agents");
            for path in sorted_entries(&dir, |p| {
                p.is_file() && p.extension().is_some_and(|e| e == "md")
            }) {
                match Agent::from_file(&path, layer.kind) {
                    Ok(agent) => {
                        let name = agent.name().to_string();
                        debug!("Discovered agent '{}' in {} layer", name, layer.kind);
                        self.agents.insert(name, agent);
                    }
                    Err(e) => {
                        warn!("Skipping agent manifest at {:?}: {:#}", path, e);
                    }
                }
            }
        }

        info!("Discovered {} agents", self.agents.len());
    }

    /// Get an agent by name
    pub fn get(&self, name: &str) -> Option<&Agent> {
        self.agents.get(name)
    }

    /// All agents, sorted by name
    pub fn get_all(&self) -> Vec<&Agent> {
        let mut all: Vec<_> = self.agents.values().collect();
        all.sort_by_key(|a| a.name().to_string());
        all
    }

    /// Number of agents
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Generate the agents section of the model system prompt.
    pub fn generate_system_prompt(&self) -> String {
        if self.agents.is_empty() {
            return String::new();
        }

        let mut prompt = String::from("\n\nAvailable agents (delegate with the Task tool):\n");
        for agent in self.get_all() {
            prompt.push_str(&agent.to_summary());
            prompt.push('\n');
        }

        prompt
    }
}

/// List entries of `dir` matching `keep`, sorted by file name.
///
/// A missing or unreadable directory yields an empty list; per the layer
/// model, absence is a normal empty contribution.
fn sorted_entries(dir: &Path, keep: impl Fn(&Path) -> bool) -> Vec<PathBuf> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            if dir.exists() {
                warn!("Failed to read directory {:?}: {}", dir, e);
            } else {
                debug!("Directory does not exist: {:?}", dir);
            }
            return Vec::new();
        }
    };

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| keep(p))
        .collect();

    paths.sort_by_key(|p| p.file_name().map(|n| n.to_os_string()));
    paths
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_new() {
        let registry = SkillRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_generate_system_prompt_empty() {
        let registry = SkillRegistry::new();
        assert!(registry.generate_system_prompt().is_empty());

        let agents = AgentRegistry::new();
        assert!(agents.generate_system_prompt().is_empty());
    }

    #[test]
    fn test_sorted_entries_missing_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("nope");
        assert!(sorted_entries(&missing, |_| true).is_empty());
    }
}
