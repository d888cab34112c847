//! Loco skill and agent discovery
//!
//! Skills and agents are markdown files with YAML frontmatter, collected
//! from an ordered set of root directories and merged into a single
//! registry per kind.
//!
//! ## Layers
//!
//! Discovery consults up to three roots, lowest precedence first:
//!
//! 1. Global config directory (e.g. `~/.loco/`)
//! 2. `<project>/.claude/` (shared convention, Claude-compatible)
//! 3. `<project>/.loco/` (project-native)
//!
//! When the same name appears in more than one layer, the entry from the
//! later (higher-precedence) layer wins. Within a single layer entries are
//! scanned in lexicographic order, so merging is deterministic regardless
//! of filesystem iteration order.
//!
//! Registries are rebuilt from scratch on every `discover` call; nothing
//! is cached across invocations.

#![deny(unsafe_code, dead_code, unused_imports, unused_variables, missing_docs)]

pub mod agent;
pub mod layer;
pub mod manifest;
pub mod registry;
pub mod skill;

pub use agent::Agent;
pub use layer::{Layer, LayerKind, LayerSet};
pub use registry::{AgentRegistry, SkillRegistry};
pub use skill::Skill;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{Agent, AgentRegistry, LayerKind, LayerSet, Skill, SkillRegistry};
}
