//! Loco planner
//!
//! Multi-step task plans: drafted, approved, then executed step by step.
//! Plans persist as JSON files under a caller-supplied directory; the
//! store never caches across calls.

pub mod plan;
pub mod store;

pub use plan::{create_plan, format_plan, Plan, PlanStatus, PlanStep, StepStatus};
pub use store::PlanStore;
