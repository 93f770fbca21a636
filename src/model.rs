//! Core data model: usage logs, declarations, classifications, and alerts.
//!
//! Tool and task-type identifiers are closed enumerations validated at every
//! ingress point via serde. All entities are immutable once created; ids are
//! assigned by the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// AI tool identifiers accepted by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    Chatgpt,
    Copilot,
    Claude,
    Other,
}

impl Tool {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tool::Chatgpt => "chatgpt",
            Tool::Copilot => "copilot",
            Tool::Claude => "claude",
            Tool::Other => "other",
        }
    }
}

/// Category of work a tool assisted with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    Grammar,
    Summarizing,
    Drafting,
    Coding,
    DirectAnswers,
}

impl TaskType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::Grammar => "grammar",
            TaskType::Summarizing => "summarizing",
            TaskType::Drafting => "drafting",
            TaskType::Coding => "coding",
            TaskType::DirectAnswers => "direct_answers",
        }
    }
}

/// Risk tier assigned to a declaration by the reconciliation engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Low => "low",
            RiskTier::Medium => "medium",
            RiskTier::High => "high",
        }
    }
}

/// A single usage-log entry created by a student.
///
/// Append-only: entries are never updated or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub id: u64,
    pub student_id: u64,
    pub assignment_id: u64,
    pub tool: Tool,
    /// Task types in the order the student submitted them; never empty.
    pub task_types: Vec<TaskType>,
    pub created_at: DateTime<Utc>,
}

/// A student's up-front declaration of the tools used on one assignment.
///
/// At most one per (student, assignment); immutable after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Declaration {
    pub id: u64,
    pub student_id: u64,
    pub assignment_id: u64,
    /// Declared tools in submission order; never empty.
    pub declared_tools: Vec<Tool>,
    pub created_at: DateTime<Utc>,
}

/// Engine output persisted once per successful declaration submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub id: u64,
    pub student_id: u64,
    pub assignment_id: u64,
    pub risk_level: RiskTier,
    /// Tools evidenced by logs but absent from the declaration.
    pub undeclared_tools: Vec<Tool>,
    /// Tools declared but with no corroborating log entry.
    pub declared_not_logged: Vec<Tool>,
    pub created_at: DateTime<Utc>,
}

/// Standing flag raised for reviewer follow-up on a high-risk classification.
///
/// At most one per classification; no acknowledgment workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: u64,
    pub classification_id: u64,
    pub student_id: u64,
    pub assignment_id: u64,
    pub risk_level: RiskTier,
    pub created_at: DateTime<Utc>,
}

/// Entry in the static assignment catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: u64,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_wire_format() {
        assert_eq!(serde_json::to_string(&Tool::Chatgpt).unwrap(), "\"chatgpt\"");
        assert_eq!(serde_json::to_string(&Tool::Copilot).unwrap(), "\"copilot\"");
        let parsed: Tool = serde_json::from_str("\"claude\"").unwrap();
        assert_eq!(parsed, Tool::Claude);
    }

    #[test]
    fn test_unknown_tool_rejected() {
        let result: Result<Tool, _> = serde_json::from_str("\"gemini\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_task_type_wire_format() {
        assert_eq!(
            serde_json::to_string(&TaskType::DirectAnswers).unwrap(),
            "\"direct_answers\""
        );
        let parsed: TaskType = serde_json::from_str("\"drafting\"").unwrap();
        assert_eq!(parsed, TaskType::Drafting);
    }

    #[test]
    fn test_unknown_task_type_rejected() {
        let result: Result<TaskType, _> = serde_json::from_str("\"plagiarism\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_risk_tier_ordering() {
        assert!(RiskTier::Low < RiskTier::Medium);
        assert!(RiskTier::Medium < RiskTier::High);
        assert_eq!(serde_json::to_string(&RiskTier::High).unwrap(), "\"high\"");
    }

    #[test]
    fn test_entity_roundtrip() {
        let entry = LogEntry {
            id: 7,
            student_id: 1,
            assignment_id: 2,
            tool: Tool::Copilot,
            task_types: vec![TaskType::Coding, TaskType::Drafting],
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"assignmentId\":2"));
        assert!(json.contains("\"taskTypes\""));
        let back: LogEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }
}
