//! Usage-log persistence. Append-only; entries are never updated or deleted.

use chrono::{DateTime, Utc};

use super::{decode, id_key, student_assignment_key, Result, Store};
use crate::model::LogEntry;

/// Optional filters for listing a student's log entries.
#[derive(Debug, Clone, Default)]
pub struct LogFilter {
    pub assignment_id: Option<u64>,
    /// Inclusive lower bound on creation time.
    pub from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on creation time.
    pub to: Option<DateTime<Utc>>,
}

impl Store {
    /// Append a log entry.
    pub fn insert_log(&self, entry: &LogEntry) -> Result<()> {
        let key = log_key(entry.student_id, entry.assignment_id, entry.id);
        self.logs_tree()
            .insert(key, serde_json::to_vec(entry)?)?;
        Ok(())
    }

    /// All entries for one (student, assignment) pair, in insertion order.
    pub fn logs_for_assignment(&self, student_id: u64, assignment_id: u64) -> Result<Vec<LogEntry>> {
        let prefix = student_assignment_key(student_id, assignment_id);
        let mut entries = Vec::new();
        for item in self.logs_tree().scan_prefix(prefix) {
            let (_, value) = item?;
            entries.push(decode(&value)?);
        }
        Ok(entries)
    }

    /// A student's entries across assignments, filtered and newest first.
    pub fn logs_for_student(&self, student_id: u64, filter: &LogFilter) -> Result<Vec<LogEntry>> {
        let mut entries = match filter.assignment_id {
            Some(assignment_id) => self.logs_for_assignment(student_id, assignment_id)?,
            None => {
                let mut all = Vec::new();
                for item in self.logs_tree().scan_prefix(student_id.to_be_bytes()) {
                    let (_, value) = item?;
                    all.push(decode::<LogEntry>(&value)?);
                }
                all
            }
        };

        entries.retain(|entry| {
            filter.from.map_or(true, |from| entry.created_at >= from)
                && filter.to.map_or(true, |to| entry.created_at <= to)
        });
        entries.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(entries)
    }
}

fn log_key(student_id: u64, assignment_id: u64, id: u64) -> [u8; 24] {
    let mut key = [0u8; 24];
    key[..16].copy_from_slice(&student_assignment_key(student_id, assignment_id));
    key[16..].copy_from_slice(&id_key(id));
    key
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{TaskType, Tool};

    fn test_store() -> (tempfile::TempDir, Store) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();
        (dir, store)
    }

    fn entry(store: &Store, student_id: u64, assignment_id: u64, tool: Tool) -> LogEntry {
        let entry = LogEntry {
            id: store.next_id().unwrap(),
            student_id,
            assignment_id,
            tool,
            task_types: vec![TaskType::Grammar],
            created_at: Utc::now(),
        };
        store.insert_log(&entry).unwrap();
        entry
    }

    #[test]
    fn test_logs_scoped_to_student_and_assignment() {
        let (_dir, store) = test_store();
        entry(&store, 1, 1, Tool::Chatgpt);
        entry(&store, 1, 2, Tool::Copilot);
        entry(&store, 2, 1, Tool::Claude);

        let logs = store.logs_for_assignment(1, 1).unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].tool, Tool::Chatgpt);

        let all = store.logs_for_student(1, &LogFilter::default()).unwrap();
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn test_insertion_order_preserved_per_assignment() {
        let (_dir, store) = test_store();
        let first = entry(&store, 1, 1, Tool::Chatgpt);
        let second = entry(&store, 1, 1, Tool::Copilot);

        let logs = store.logs_for_assignment(1, 1).unwrap();
        assert_eq!(logs[0].id, first.id);
        assert_eq!(logs[1].id, second.id);
    }

    #[test]
    fn test_student_listing_is_newest_first() {
        let (_dir, store) = test_store();
        let first = entry(&store, 1, 1, Tool::Chatgpt);
        let second = entry(&store, 1, 2, Tool::Copilot);

        let logs = store.logs_for_student(1, &LogFilter::default()).unwrap();
        assert_eq!(logs[0].id, second.id);
        assert_eq!(logs[1].id, first.id);
    }

    #[test]
    fn test_time_range_filter() {
        let (_dir, store) = test_store();
        let kept = entry(&store, 1, 1, Tool::Chatgpt);

        let filter = LogFilter {
            from: Some(kept.created_at),
            to: Some(kept.created_at),
            ..Default::default()
        };
        assert_eq!(store.logs_for_student(1, &filter).unwrap().len(), 1);

        let excluded = LogFilter {
            to: Some(kept.created_at - chrono::Duration::seconds(1)),
            ..Default::default()
        };
        assert!(store.logs_for_student(1, &excluded).unwrap().is_empty());
    }
}
