//! Markdown report generation for cost profiles

use chrono::Utc;

use crate::profile::CostProfile;

/// Maximum duplicate-read entries listed in a report
const MAX_DUPLICATES: usize = 10;

/// Generate a markdown report from a cost profile.
pub fn generate_report(profile: &CostProfile) -> String {
    let duration = Utc::now().signed_duration_since(profile.start_time);
    let total_secs = duration.num_seconds().max(0);
    let duration_str = format!("{}m {}s", total_secs / 60, total_secs % 60);

    let mut lines = vec![
        "# Loco Cost Profile Report".to_string(),
        String::new(),
        format!("**Session ID:** {}", profile.session_id),
        format!("**Duration:** {duration_str}"),
        format!("**Total Cost:** ${:.4}", profile.total_cost()),
        String::new(),
        "## Token Usage".to_string(),
        String::new(),
        format!("- Input tokens: {}", profile.total_input_tokens()),
        format!("- Output tokens: {}", profile.total_output_tokens()),
        format!("- Cache read: {}", profile.total_cache_read()),
        format!("- Cache write: {}", profile.total_cache_write()),
        String::new(),
        "## Cost by Operation Type".to_string(),
        String::new(),
        "| Operation | Cost | Percentage |".to_string(),
        "|-----------|------|------------|".to_string(),
    ];

    let total = if profile.total_cost() > 0.0 {
        profile.total_cost()
    } else {
        1.0
    };

    for (op, cost) in profile.cost_by_operation() {
        let pct = (cost / total) * 100.0;
        lines.push(format!("| {op} | ${cost:.4} | {pct:.1}% |"));
    }

    lines.extend([
        String::new(),
        "## Cost by Agent".to_string(),
        String::new(),
        "| Agent | Cost | Percentage |".to_string(),
        "|-------|------|------------|".to_string(),
    ]);

    for (agent, cost) in profile.cost_by_agent() {
        let pct = (cost / total) * 100.0;
        lines.push(format!("| {agent} | ${cost:.4} | {pct:.1}% |"));
    }

    let duplicates = profile.duplicate_file_reads();
    if !duplicates.is_empty() {
        lines.extend([
            String::new(),
            "## Optimization Opportunities".to_string(),
            String::new(),
            "### Duplicate File Reads".to_string(),
            String::new(),
        ]);
        for (path, count) in duplicates.into_iter().take(MAX_DUPLICATES) {
            lines.push(format!("- `{path}`: read {count}x ({} duplicates)", count - 1));
        }
    }

    lines.extend([
        String::new(),
        "---".to_string(),
        format!("*Generated at {}*", Utc::now().to_rfc3339()),
    ]);

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{OperationType, TrackedCall};
    use chrono::Utc;

    fn profile_with_calls() -> CostProfile {
        let mut profile = CostProfile::new("report1");
        profile.add_call(TrackedCall {
            timestamp: Utc::now(),
            model: "gpt-4o".to_string(),
            operation_type: OperationType::Planning,
            input_tokens: 1000,
            output_tokens: 500,
            cache_read_tokens: 0,
            cache_write_tokens: 0,
            cost: 0.20,
            agent_name: Some("planner".to_string()),
            tool_name: None,
            metadata: serde_json::Value::Null,
        });
        profile.record_file_read("src/main.rs");
        profile.record_file_read("src/main.rs");
        profile
    }

    #[test]
    fn test_report_contains_sections() {
        let report = generate_report(&profile_with_calls());
        assert!(report.contains("# Loco Cost Profile Report"));
        assert!(report.contains("**Session ID:** report1"));
        assert!(report.contains("## Token Usage"));
        assert!(report.contains("| planning | $0.2000 | 100.0% |"));
        assert!(report.contains("| planner | $0.2000 | 100.0% |"));
        assert!(report.contains("`src/main.rs`: read 2x (1 duplicates)"));
    }

    #[test]
    fn test_empty_profile_report_has_no_duplicate_section() {
        let profile = CostProfile::new("empty");
        let report = generate_report(&profile);
        assert!(report.contains("**Total Cost:** $0.0000"));
        assert!(!report.contains("Optimization Opportunities"));
    }
}
