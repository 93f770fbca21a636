//! Usage–declaration reconciliation and risk classification.
//!
//! [`classify`] is a pure function: the outcome depends only on the supplied
//! log entries and declared tools. Persistence and alerting happen in
//! [`crate::service`], which keeps this module independently testable.

use crate::model::{LogEntry, RiskTier, TaskType, Tool};

/// Log-entry count at which usage frequency alone qualifies as medium risk.
const MEDIUM_FREQUENCY_THRESHOLD: usize = 3;

/// Outcome of reconciling logged usage against a declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    pub tier: RiskTier,
    /// Tools evidenced by logs but absent from the declaration, in
    /// first-logged order.
    pub undeclared_tools: Vec<Tool>,
    /// Tools declared but never logged, in declaration order.
    pub declared_not_logged: Vec<Tool>,
}

/// Compare logged tool usage against declared tools and derive a risk tier.
///
/// The tier cascade checks high before medium before low; a high condition
/// wins even when a medium condition also holds:
/// - high: any entry's task types include `direct_answers`, or a logged tool
///   was not declared
/// - medium: any entry's task types include `drafting` or `coding`, or the
///   entry count reaches [`MEDIUM_FREQUENCY_THRESHOLD`]
/// - low: everything else, including zero log entries
///
/// Never fails; callers reject malformed input (empty declared set, unknown
/// identifiers) before invoking.
pub fn classify(logs: &[LogEntry], declared_tools: &[Tool]) -> Reconciliation {
    let logged_tools = distinct_logged_tools(logs);

    let undeclared_tools: Vec<Tool> = logged_tools
        .iter()
        .copied()
        .filter(|tool| !declared_tools.contains(tool))
        .collect();

    let declared_not_logged: Vec<Tool> = dedup_preserving_order(declared_tools)
        .into_iter()
        .filter(|tool| !logged_tools.contains(tool))
        .collect();

    let has_direct_answers = logs
        .iter()
        .any(|entry| entry.task_types.contains(&TaskType::DirectAnswers));

    let has_substantial_tasks = logs.iter().any(|entry| {
        entry.task_types.contains(&TaskType::Drafting)
            || entry.task_types.contains(&TaskType::Coding)
    });

    let tier = if has_direct_answers || !undeclared_tools.is_empty() {
        RiskTier::High
    } else if has_substantial_tasks || logs.len() >= MEDIUM_FREQUENCY_THRESHOLD {
        RiskTier::Medium
    } else {
        RiskTier::Low
    };

    Reconciliation {
        tier,
        undeclared_tools,
        declared_not_logged,
    }
}

/// Distinct tools across the log set, preserving first-occurrence order.
fn distinct_logged_tools(logs: &[LogEntry]) -> Vec<Tool> {
    let mut seen = Vec::new();
    for entry in logs {
        if !seen.contains(&entry.tool) {
            seen.push(entry.tool);
        }
    }
    seen
}

fn dedup_preserving_order(tools: &[Tool]) -> Vec<Tool> {
    let mut seen = Vec::new();
    for tool in tools {
        if !seen.contains(tool) {
            seen.push(*tool);
        }
    }
    seen
}
