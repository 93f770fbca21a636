//! Declaration persistence and the atomic submission write.
//!
//! Uniqueness on (student, assignment) is enforced by the key layout: the
//! declaration tree is keyed by the composite pair, and the insert happens
//! inside a serializable transaction with an insert-if-absent check. The
//! pre-check callers run first is advisory only; a concurrent winner
//! surfaces here as [`StoreError::DuplicateDeclaration`].

use sled::transaction::{ConflictableTransactionError, TransactionError};
use sled::Transactional;

use super::{decode, id_key, student_assignment_key, Result, Store, StoreError};
use crate::model::{Alert, Classification, Declaration};

/// Everything written by one declaration submission.
///
/// The declaration, its classification, and (for high risk) its alert are
/// committed together; a crash cannot leave a declaration without its
/// classification.
#[derive(Debug, Clone)]
pub struct SubmissionRecord {
    pub declaration: Declaration,
    pub classification: Classification,
    pub alert: Option<Alert>,
}

impl Store {
    /// The declaration for a (student, assignment) pair, if any.
    pub fn declaration(&self, student_id: u64, assignment_id: u64) -> Result<Option<Declaration>> {
        let key = student_assignment_key(student_id, assignment_id);
        match self.declarations_tree().get(key)? {
            Some(value) => Ok(Some(decode(&value)?)),
            None => Ok(None),
        }
    }

    /// All declarations submitted by one student, in assignment order.
    pub fn declarations_for_student(&self, student_id: u64) -> Result<Vec<Declaration>> {
        let mut declarations = Vec::new();
        for item in self.declarations_tree().scan_prefix(student_id.to_be_bytes()) {
            let (_, value) = item?;
            declarations.push(decode(&value)?);
        }
        Ok(declarations)
    }

    /// Atomically insert a declaration with its classification and alert.
    ///
    /// Fails with [`StoreError::DuplicateDeclaration`] when a declaration
    /// already exists for the pair, leaving all three trees untouched.
    pub fn insert_submission(&self, record: &SubmissionRecord) -> Result<()> {
        let declaration_key = student_assignment_key(
            record.declaration.student_id,
            record.declaration.assignment_id,
        );
        let declaration_bytes = serde_json::to_vec(&record.declaration)?;
        let classification_key = id_key(record.classification.id);
        let classification_bytes = serde_json::to_vec(&record.classification)?;
        let alert_write = match &record.alert {
            Some(alert) => Some((id_key(alert.id), serde_json::to_vec(alert)?)),
            None => None,
        };

        let result = (
            self.declarations_tree(),
            self.classifications_tree(),
            self.alerts_tree(),
        )
            .transaction(|(declarations, classifications, alerts)| {
                if declarations.get(declaration_key)?.is_some() {
                    return Err(ConflictableTransactionError::Abort(()));
                }
                declarations.insert(&declaration_key[..], declaration_bytes.as_slice())?;
                classifications.insert(&classification_key[..], classification_bytes.as_slice())?;
                if let Some((key, bytes)) = &alert_write {
                    alerts.insert(&key[..], bytes.as_slice())?;
                }
                Ok(())
            });

        match result {
            Ok(()) => Ok(()),
            Err(TransactionError::Abort(())) => Err(StoreError::DuplicateDeclaration),
            Err(TransactionError::Storage(err)) => Err(StoreError::Backend(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{RiskTier, Tool};
    use chrono::Utc;

    fn test_store() -> (tempfile::TempDir, Store) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();
        (dir, store)
    }

    fn record(store: &Store, student_id: u64, assignment_id: u64, tier: RiskTier) -> SubmissionRecord {
        let now = Utc::now();
        let classification_id = store.next_id().unwrap();
        SubmissionRecord {
            declaration: Declaration {
                id: store.next_id().unwrap(),
                student_id,
                assignment_id,
                declared_tools: vec![Tool::Chatgpt],
                created_at: now,
            },
            classification: Classification {
                id: classification_id,
                student_id,
                assignment_id,
                risk_level: tier,
                undeclared_tools: vec![],
                declared_not_logged: vec![],
                created_at: now,
            },
            alert: (tier == RiskTier::High).then(|| Alert {
                id: store.next_id().unwrap(),
                classification_id,
                student_id,
                assignment_id,
                risk_level: tier,
                created_at: now,
            }),
        }
    }

    #[test]
    fn test_submission_writes_all_rows() {
        let (_dir, store) = test_store();
        store
            .insert_submission(&record(&store, 1, 1, RiskTier::High))
            .unwrap();

        assert!(store.declaration(1, 1).unwrap().is_some());
        assert_eq!(store.all_classifications().unwrap().len(), 1);
        assert_eq!(store.all_alerts().unwrap().len(), 1);
    }

    #[test]
    fn test_no_alert_row_below_high() {
        let (_dir, store) = test_store();
        store
            .insert_submission(&record(&store, 1, 1, RiskTier::Medium))
            .unwrap();

        assert_eq!(store.all_classifications().unwrap().len(), 1);
        assert!(store.all_alerts().unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_submission_rejected_and_rolled_back() {
        let (_dir, store) = test_store();
        store
            .insert_submission(&record(&store, 1, 1, RiskTier::Low))
            .unwrap();

        let err = store
            .insert_submission(&record(&store, 1, 1, RiskTier::High))
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateDeclaration));

        // The losing submission left no classification or alert behind.
        assert_eq!(store.all_classifications().unwrap().len(), 1);
        assert!(store.all_alerts().unwrap().is_empty());
    }

    #[test]
    fn test_same_student_different_assignments_allowed() {
        let (_dir, store) = test_store();
        store
            .insert_submission(&record(&store, 1, 1, RiskTier::Low))
            .unwrap();
        store
            .insert_submission(&record(&store, 1, 2, RiskTier::Low))
            .unwrap();

        assert_eq!(store.declarations_for_student(1).unwrap().len(), 2);
    }
}
