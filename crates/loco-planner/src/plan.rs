//! Plan and step types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Status of a plan step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    /// Not started yet
    Pending,
    /// Currently being executed
    InProgress,
    /// Finished successfully
    Completed,
    /// Failed
    Failed,
    /// Deliberately skipped
    Skipped,
}

/// Status of a plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    /// Drafted, awaiting approval
    Draft,
    /// Approved for execution
    Approved,
    /// Execution in progress
    Executing,
    /// All steps done
    Completed,
    /// Execution failed
    Failed,
    /// Cancelled by the user
    Cancelled,
}

/// A single step in a plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanStep {
    /// Step identifier (`step-1`, `step-2`, ...)
    pub id: String,
    /// What this step does
    pub description: String,
    /// Current status
    pub status: StepStatus,
    /// Result text once completed
    #[serde(default)]
    pub result: Option<String>,
    /// Error text once failed
    #[serde(default)]
    pub error: Option<String>,
}

impl PlanStep {
    /// Create a pending step
    pub fn new(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            status: StepStatus::Pending,
            result: None,
            error: None,
        }
    }
}

/// A multi-step execution plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    /// Short plan identifier
    pub id: String,
    /// The task this plan addresses
    pub task: String,
    /// Ordered steps
    pub steps: Vec<PlanStep>,
    /// Current status
    pub status: PlanStatus,
    /// When the plan was drafted
    pub created_at: DateTime<Utc>,
    /// When the plan was approved
    #[serde(default)]
    pub approved_at: Option<DateTime<Utc>>,
    /// When execution finished
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Plan {
    /// The step currently being executed, if any
    pub fn current_step(&self) -> Option<&PlanStep> {
        self.steps.iter().find(|s| s.status == StepStatus::InProgress)
    }

    /// The next pending step, if any
    pub fn next_step(&self) -> Option<&PlanStep> {
        self.steps.iter().find(|s| s.status == StepStatus::Pending)
    }

    /// Progress as (completed, total) step counts
    pub fn progress(&self) -> (usize, usize) {
        let completed = self
            .steps
            .iter()
            .filter(|s| s.status == StepStatus::Completed)
            .count();
        (completed, self.steps.len())
    }
}

/// Create a new draft plan from a task and step descriptions.
pub fn create_plan(task: &str, steps: &[String]) -> Plan {
    let id = Uuid::new_v4().to_string()[..8].to_string();

    let plan_steps = steps
        .iter()
        .enumerate()
        .map(|(i, desc)| PlanStep::new(format!("step-{}", i + 1), desc))
        .collect();

    Plan {
        id,
        task: task.to_string(),
        steps: plan_steps,
        status: PlanStatus::Draft,
        created_at: Utc::now(),
        approved_at: None,
        completed_at: None,
    }
}

fn status_glyph(status: StepStatus) -> char {
    match status {
        StepStatus::Pending => '○',
        StepStatus::InProgress => '◐',
        StepStatus::Completed => '●',
        StepStatus::Failed => '✗',
        StepStatus::Skipped => '⊘',
    }
}

fn plan_status_label(status: PlanStatus) -> &'static str {
    match status {
        PlanStatus::Draft => "draft",
        PlanStatus::Approved => "approved",
        PlanStatus::Executing => "executing",
        PlanStatus::Completed => "completed",
        PlanStatus::Failed => "failed",
        PlanStatus::Cancelled => "cancelled",
    }
}

/// Format a plan for terminal display.
pub fn format_plan(plan: &Plan) -> String {
    let mut lines = Vec::new();
    lines.push(format!("Plan: {}", plan.task));
    lines.push(format!("ID: {} | Status: {}", plan.id, plan_status_label(plan.status)));
    lines.push(String::new());

    let (completed, total) = plan.progress();
    if matches!(plan.status, PlanStatus::Executing | PlanStatus::Completed) {
        lines.push(format!("Progress: {completed}/{total} steps completed"));
        lines.push(String::new());
    }

    for (i, step) in plan.steps.iter().enumerate() {
        lines.push(format!(
            "{} {}. {}",
            status_glyph(step.status),
            i + 1,
            step.description
        ));
        if let Some(error) = &step.error {
            lines.push(format!("   Error: {error}"));
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_plan() {
        let plan = create_plan("Add auth", &["Read module".into(), "Write middleware".into()]);
        assert_eq!(plan.id.len(), 8);
        assert_eq!(plan.status, PlanStatus::Draft);
        assert_eq!(plan.steps.len(), 2);
        assert_eq!(plan.steps[0].id, "step-1");
        assert_eq!(plan.steps[1].id, "step-2");
        assert!(plan.approved_at.is_none());
    }

    #[test]
    fn test_progress_and_next_step() {
        let mut plan = create_plan("t", &["a".into(), "b".into(), "c".into()]);
        plan.steps[0].status = StepStatus::Completed;
        plan.steps[1].status = StepStatus::InProgress;

        assert_eq!(plan.progress(), (1, 3));
        assert_eq!(plan.current_step().unwrap().id, "step-2");
        assert_eq!(plan.next_step().unwrap().id, "step-3");
    }

    #[test]
    fn test_format_plan_shows_errors() {
        let mut plan = create_plan("t", &["a".into()]);
        plan.steps[0].status = StepStatus::Failed;
        plan.steps[0].error = Some("boom".into());

        let text = format_plan(&plan);
        assert!(text.contains("✗ 1. a"));
        assert!(text.contains("Error: boom"));
    }

    #[test]
    fn test_status_wire_strings() {
        assert_eq!(serde_json::to_string(&StepStatus::InProgress).unwrap(), "\"in_progress\"");
        assert_eq!(serde_json::to_string(&PlanStatus::Draft).unwrap(), "\"draft\"");
    }
}
