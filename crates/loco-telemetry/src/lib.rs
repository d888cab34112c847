//! Loco telemetry
//!
//! Token usage accounting and per-session cost profiling. The tracker is
//! an explicit value owned by the caller; there is no process-global
//! state, and a profile is just a serializable snapshot the caller saves
//! or loads.

pub mod profile;
pub mod report;
pub mod tracker;
pub mod usage;

pub use profile::{CostProfile, OperationType, TrackedCall};
pub use report::generate_report;
pub use tracker::CostTracker;
pub use usage::{estimate_cost, SessionUsage, UsageStats};
