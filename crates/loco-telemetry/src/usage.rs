//! Token usage and cost estimation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Approximate cost per 1M tokens: (model prefix, input, output) in USD
const MODEL_COSTS: &[(&str, f64, f64)] = &[
    // OpenAI GPT-4
    ("gpt-4o-mini", 0.15, 0.60),
    ("gpt-4o", 2.50, 10.00),
    ("gpt-4-turbo", 10.00, 30.00),
    ("gpt-4", 30.00, 60.00),
    ("gpt-3.5-turbo", 0.50, 1.50),
    // Anthropic Claude
    ("claude-3-5-sonnet", 3.00, 15.00),
    ("claude-3-opus", 15.00, 75.00),
    ("claude-3-sonnet", 3.00, 15.00),
    ("claude-3-haiku", 0.25, 1.25),
    // Other providers (approximate)
    ("gemini-1.5-pro", 1.25, 5.00),
    ("gemini-1.5-flash", 0.075, 0.30),
    ("command-r-plus", 3.00, 15.00),
    ("command-r", 0.50, 1.50),
];

/// Conservative fallback for models not in the table
const DEFAULT_COSTS: (f64, f64) = (5.00, 15.00);

/// Estimate the cost of a completion in USD from token counts.
///
/// Matching is by substring against known model prefixes; longer,
/// more specific prefixes are listed first in the table.
pub fn estimate_cost(model: &str, prompt_tokens: u64, completion_tokens: u64) -> f64 {
    let model_lower = model.to_lowercase();

    let (input_cost, output_cost) = MODEL_COSTS
        .iter()
        .find(|(prefix, _, _)| model_lower.contains(prefix))
        .map(|(_, input, output)| (*input, *output))
        .unwrap_or(DEFAULT_COSTS);

    (prompt_tokens as f64 * input_cost + completion_tokens as f64 * output_cost) / 1_000_000.0
}

/// Statistics for a single API call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageStats {
    /// Model identifier
    pub model: String,
    /// Input/prompt tokens
    pub prompt_tokens: u64,
    /// Output/completion tokens
    pub completion_tokens: u64,
    /// Total tokens
    pub total_tokens: u64,
    /// Estimated cost in USD
    pub cost: f64,
    /// When the call happened
    pub timestamp: DateTime<Utc>,
}

impl UsageStats {
    /// Build stats from raw token counts, estimating the cost
    pub fn from_counts(model: &str, prompt_tokens: u64, completion_tokens: u64) -> Self {
        Self {
            model: model.to_string(),
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
            cost: estimate_cost(model, prompt_tokens, completion_tokens),
            timestamp: Utc::now(),
        }
    }
}

/// Accumulated usage statistics for a session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionUsage {
    /// All recorded calls
    pub stats: Vec<UsageStats>,
}

impl SessionUsage {
    /// Create an empty session
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a usage stat
    pub fn add(&mut self, stat: UsageStats) {
        self.stats.push(stat);
    }

    /// Total tokens used in this session
    pub fn total_tokens(&self) -> u64 {
        self.stats.iter().map(|s| s.total_tokens).sum()
    }

    /// Total estimated cost for this session. Folded from an explicit 0.0
    /// so an empty session reports positive zero.
    pub fn total_cost(&self) -> f64 {
        self.stats.iter().fold(0.0, |acc, s| acc + s.cost)
    }

    /// Total prompt tokens
    pub fn prompt_tokens(&self) -> u64 {
        self.stats.iter().map(|s| s.prompt_tokens).sum()
    }

    /// Total completion tokens
    pub fn completion_tokens(&self) -> u64 {
        self.stats.iter().map(|s| s.completion_tokens).sum()
    }

    /// Number of API calls made
    pub fn call_count(&self) -> usize {
        self.stats.len()
    }
}
