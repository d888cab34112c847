//! Plan persistence: one JSON file per plan under a caller-owned directory

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use tracing::warn;

use crate::plan::Plan;

/// Filesystem store for plans
#[derive(Debug, Clone)]
pub struct PlanStore {
    dir: PathBuf,
}

impl PlanStore {
    /// Create a store rooted at `dir` (e.g. `~/.loco/plans`), creating
    /// the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).with_context(|| format!("Failed to create {:?}", dir))?;
        Ok(Self { dir })
    }

    fn plan_path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }

    /// Save a plan, overwriting any previous version
    pub fn save(&self, plan: &Plan) -> Result<()> {
        let json = serde_json::to_string_pretty(plan)?;
        let path = self.plan_path(&plan.id);
        fs::write(&path, json).with_context(|| format!("Failed to write {:?}", path))?;
        Ok(())
    }

    /// Load a plan by id; `None` when it does not exist
    pub fn load(&self, id: &str) -> Result<Option<Plan>> {
        let path = self.plan_path(id);
        if !path.exists() {
            return Ok(None);
        }

        let json =
            fs::read_to_string(&path).with_context(|| format!("Failed to read {:?}", path))?;
        let plan = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse {:?}", path))?;
        Ok(Some(plan))
    }

    /// List all saved plans, newest first. Unreadable files are skipped
    /// with a warning.
    pub fn list(&self) -> Vec<Plan> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(_) => return Vec::new(),
        };

        let mut plans: Vec<Plan> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|e| e == "json"))
            .filter_map(|path| match fs::read_to_string(&path) {
                Ok(json) => match serde_json::from_str(&json) {
                    Ok(plan) => Some(plan),
                    Err(e) => {
                        warn!("Skipping unreadable plan {:?}: {}", path, e);
                        None
                    }
                },
                Err(e) => {
                    warn!("Skipping unreadable plan {:?}: {}", path, e);
                    None
                }
            })
            .collect();

        plans.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        plans
    }

    /// Delete a plan by id; `Ok(false)` when it did not exist
    pub fn delete(&self, id: &str) -> Result<bool> {
        let path = self.plan_path(id);
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(&path).with_context(|| format!("Failed to delete {:?}", path))?;
        Ok(true)
    }
}
