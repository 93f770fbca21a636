//! Request-level orchestration over the store and the engine.
//!
//! The submission path: advisory existence checks, log fetch, pure
//! classification, then one atomic store write for the declaration,
//! classification, and (when high risk) alert.

use std::sync::Arc;

use chrono::Utc;

use crate::engine;
use crate::error::ApiError;
use crate::model::{Alert, Assignment, Classification, Declaration, LogEntry, RiskTier, TaskType, Tool};
use crate::store::{LogFilter, Store, SubmissionRecord};
use crate::telemetry::AppMetrics;

/// Shared application service handed to every request handler.
#[derive(Clone)]
pub struct AppService {
    store: Arc<Store>,
    metrics: Arc<AppMetrics>,
}

impl AppService {
    pub fn new(store: Arc<Store>, metrics: Arc<AppMetrics>) -> Self {
        Self { store, metrics }
    }

    /// Append a usage-log entry for the authenticated student.
    pub fn record_log(
        &self,
        student_id: u64,
        assignment_id: u64,
        tool: Tool,
        task_types: Vec<TaskType>,
    ) -> Result<LogEntry, ApiError> {
        if task_types.is_empty() {
            return Err(ApiError::validation("taskTypes must not be empty"));
        }
        self.require_assignment(assignment_id)?;

        let entry = LogEntry {
            id: self.store.next_id()?,
            student_id,
            assignment_id,
            tool,
            task_types,
            created_at: Utc::now(),
        };
        self.store.insert_log(&entry)?;

        tracing::debug!(
            student_id,
            assignment_id,
            tool = entry.tool.as_str(),
            "usage log recorded"
        );
        Ok(entry)
    }

    /// The authenticated student's log entries, filtered, newest first.
    pub fn student_logs(&self, student_id: u64, filter: &LogFilter) -> Result<Vec<LogEntry>, ApiError> {
        Ok(self.store.logs_for_student(student_id, filter)?)
    }

    /// Submit a declaration and run reconciliation for it.
    ///
    /// Returns the declaration; the classification and any alert are side
    /// effects committed in the same store transaction.
    pub fn submit_declaration(
        &self,
        student_id: u64,
        assignment_id: u64,
        declared_tools: Vec<Tool>,
    ) -> Result<Declaration, ApiError> {
        if declared_tools.is_empty() {
            return Err(ApiError::validation("declaredTools must not be empty"));
        }
        self.require_assignment(assignment_id)?;

        // Advisory only; the store's uniqueness constraint decides races.
        if self.store.declaration(student_id, assignment_id)?.is_some() {
            self.metrics.record_declaration_conflict();
            return Err(ApiError::conflict(
                "Declaration already exists for this assignment",
            ));
        }

        let logs = self.store.logs_for_assignment(student_id, assignment_id)?;
        let outcome = engine::classify(&logs, &declared_tools);
        let tier = outcome.tier;

        let now = Utc::now();
        let declaration = Declaration {
            id: self.store.next_id()?,
            student_id,
            assignment_id,
            declared_tools,
            created_at: now,
        };
        let classification = Classification {
            id: self.store.next_id()?,
            student_id,
            assignment_id,
            risk_level: tier,
            undeclared_tools: outcome.undeclared_tools,
            declared_not_logged: outcome.declared_not_logged,
            created_at: now,
        };
        let alert = if tier == RiskTier::High {
            Some(Alert {
                id: self.store.next_id()?,
                classification_id: classification.id,
                student_id,
                assignment_id,
                risk_level: tier,
                created_at: now,
            })
        } else {
            None
        };

        let record = SubmissionRecord {
            declaration: declaration.clone(),
            classification,
            alert,
        };
        if let Err(err) = self.store.insert_submission(&record) {
            let api_err: ApiError = err.into();
            if matches!(api_err, ApiError::Conflict(_)) {
                self.metrics.record_declaration_conflict();
            }
            return Err(api_err);
        }

        self.metrics.record_classification(tier);
        if tier == RiskTier::High {
            self.metrics.record_alert();
            tracing::warn!(
                student_id,
                assignment_id,
                classification_id = record.classification.id,
                "high-risk declaration, alert raised"
            );
        } else {
            tracing::info!(
                student_id,
                assignment_id,
                risk_level = tier.as_str(),
                "declaration classified"
            );
        }

        Ok(declaration)
    }

    /// The authenticated student's declarations.
    pub fn student_declarations(&self, student_id: u64) -> Result<Vec<Declaration>, ApiError> {
        Ok(self.store.declarations_for_student(student_id)?)
    }

    /// Every classification row.
    pub fn all_classifications(&self) -> Result<Vec<Classification>, ApiError> {
        Ok(self.store.all_classifications()?)
    }

    /// Every alert row.
    pub fn all_alerts(&self) -> Result<Vec<Alert>, ApiError> {
        Ok(self.store.all_alerts()?)
    }

    /// The assignment catalog.
    pub fn assignment_catalog(&self) -> Result<Vec<Assignment>, ApiError> {
        Ok(self.store.all_assignments()?)
    }

    fn require_assignment(&self, assignment_id: u64) -> Result<(), ApiError> {
        if self.store.assignment(assignment_id)?.is_none() {
            return Err(ApiError::not_found("Assignment not found"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::DEFAULT_ASSIGNMENTS;

    fn test_service() -> (tempfile::TempDir, AppService) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();
        store.seed_assignments(DEFAULT_ASSIGNMENTS).unwrap();
        let metrics = Arc::new(AppMetrics::new().unwrap());
        let service = AppService::new(Arc::new(store), metrics);
        (dir, service)
    }

    #[test]
    fn test_record_log_rejects_empty_task_types() {
        let (_dir, service) = test_service();
        let err = service.record_log(1, 1, Tool::Chatgpt, vec![]).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn test_record_log_rejects_unknown_assignment() {
        let (_dir, service) = test_service();
        let err = service
            .record_log(1, 999, Tool::Chatgpt, vec![TaskType::Grammar])
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[test]
    fn test_submission_classifies_and_persists() {
        let (_dir, service) = test_service();
        service
            .record_log(1, 1, Tool::Chatgpt, vec![TaskType::Grammar])
            .unwrap();

        let declaration = service
            .submit_declaration(1, 1, vec![Tool::Chatgpt])
            .unwrap();
        assert_eq!(declaration.declared_tools, vec![Tool::Chatgpt]);

        let classifications = service.all_classifications().unwrap();
        assert_eq!(classifications.len(), 1);
        assert_eq!(classifications[0].risk_level, RiskTier::Low);
        assert!(service.all_alerts().unwrap().is_empty());
    }

    #[test]
    fn test_high_risk_submission_raises_alert() {
        let (_dir, service) = test_service();
        service
            .record_log(1, 1, Tool::Chatgpt, vec![TaskType::DirectAnswers])
            .unwrap();

        service
            .submit_declaration(1, 1, vec![Tool::Chatgpt])
            .unwrap();

        let classifications = service.all_classifications().unwrap();
        assert_eq!(classifications[0].risk_level, RiskTier::High);

        let alerts = service.all_alerts().unwrap();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].classification_id, classifications[0].id);
        assert_eq!(alerts[0].risk_level, RiskTier::High);
    }

    #[test]
    fn test_second_submission_conflicts() {
        let (_dir, service) = test_service();
        service
            .submit_declaration(1, 1, vec![Tool::Chatgpt])
            .unwrap();

        let err = service
            .submit_declaration(1, 1, vec![Tool::Copilot])
            .unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));

        // Only the first submission's classification exists.
        assert_eq!(service.all_classifications().unwrap().len(), 1);
    }

    #[test]
    fn test_empty_declared_tools_rejected_before_classification() {
        let (_dir, service) = test_service();
        let err = service.submit_declaration(1, 1, vec![]).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        assert!(service.all_classifications().unwrap().is_empty());
    }

    #[test]
    fn test_submission_with_unknown_assignment_rejected() {
        let (_dir, service) = test_service();
        let err = service
            .submit_declaration(1, 999, vec![Tool::Chatgpt])
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }
}
