//! Discovery layers and their precedence order

use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Which layer an entry was discovered in, lowest precedence first.
///
/// The derived `Ord` matches merge order: `Global < ClaudeDir < LocoDir`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LayerKind {
    /// User-global config directory (e.g. `~/.loco/`)
    Global,
    /// Project `.claude/` directory (shared convention)
    ClaudeDir,
    /// Project `.loco/` directory (project-native, highest precedence)
    LocoDir,
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayerKind::Global => write!(f, "global"),
            LayerKind::ClaudeDir => write!(f, ".claude"),
            LayerKind::LocoDir => write!(f, ".loco"),
        }
    }
}

/// One root directory consulted during discovery
#[derive(Debug, Clone)]
pub struct Layer {
    /// Precedence rank of this root
    pub kind: LayerKind,
    /// Root directory; entry conventions live under `<root>/skills/` and `<root>/agents/`
    pub root: PathBuf,
}

/// Ordered list of existing layer roots, lowest precedence first.
///
/// Merge order must match enumeration order exactly; correctness of the
/// registry is defined entirely by this order.
#[derive(Debug, Clone, Default)]
pub struct LayerSet {
    layers: Vec<Layer>,
}

impl LayerSet {
    /// Build the layer set for a project.
    ///
    /// `global_dir` is the user-global config directory (externally
    /// supplied, typically `~/.loco`). Roots that do not exist are
    /// skipped; a missing layer contributes nothing and is not an error.
    pub fn for_project(project_root: &Path, global_dir: Option<&Path>) -> Self {
        let mut candidates: Vec<(LayerKind, PathBuf)> = Vec::new();

        if let Some(global) = global_dir {
            candidates.push((LayerKind::Global, global.to_path_buf()));
        }
        candidates.push((LayerKind::ClaudeDir, project_root.join(".claude")));
        candidates.push((LayerKind::LocoDir, project_root.join(".loco")));

        let mut layers = Vec::new();
        for (kind, root) in candidates {
            if !root.is_dir() {
                debug!("Layer root does not exist, skipping: {:?}", root);
                continue;
            }
            layers.push(Layer { kind, root });
        }

        Self { layers }
    }

    /// Iterate layers in merge order (lowest precedence first)
    pub fn iter(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter()
    }

    /// Number of existing layer roots
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// True when no layer root exists
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_kind_ordering_matches_precedence() {
        assert!(LayerKind::Global < LayerKind::ClaudeDir);
        assert!(LayerKind::ClaudeDir < LayerKind::LocoDir);
    }

    #[test]
    fn test_missing_roots_are_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        let layers = LayerSet::for_project(tmp.path(), None);
        assert!(layers.is_empty());
    }

    #[test]
    fn test_enumeration_order_is_fixed() {
        let tmp = tempfile::tempdir().unwrap();
        let global = tmp.path().join("home/.loco");
        fs::create_dir_all(&global).unwrap();
        fs::create_dir_all(tmp.path().join(".claude")).unwrap();
        fs::create_dir_all(tmp.path().join(".loco")).unwrap();

        let layers = LayerSet::for_project(tmp.path(), Some(&global));
        let kinds: Vec<_> = layers.iter().map(|l| l.kind).collect();
        assert_eq!(
            kinds,
            vec![LayerKind::Global, LayerKind::ClaudeDir, LayerKind::LocoDir]
        );
    }
}
