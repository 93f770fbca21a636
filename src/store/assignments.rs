//! Static assignment catalog, seeded once at startup.

use chrono::Utc;

use super::{decode, id_key, Result, Store};
use crate::model::Assignment;

/// Catalog installed on first startup against an empty database.
pub const DEFAULT_ASSIGNMENTS: &[&str] = &[
    "Essay 1: Academic Integrity",
    "Programming Project 1",
    "Literature Review",
];

impl Store {
    /// Install the catalog if the tree is empty. Re-running is a no-op.
    pub fn seed_assignments(&self, titles: &[&str]) -> Result<()> {
        if !self.assignments_tree().is_empty() {
            return Ok(());
        }
        for (index, title) in titles.iter().enumerate() {
            let assignment = Assignment {
                id: index as u64 + 1,
                title: (*title).to_string(),
                created_at: Utc::now(),
            };
            self.assignments_tree()
                .insert(id_key(assignment.id), serde_json::to_vec(&assignment)?)?;
        }
        Ok(())
    }

    /// Look up one assignment by id.
    pub fn assignment(&self, id: u64) -> Result<Option<Assignment>> {
        match self.assignments_tree().get(id_key(id))? {
            Some(value) => Ok(Some(decode(&value)?)),
            None => Ok(None),
        }
    }

    /// The full catalog, in id order.
    pub fn all_assignments(&self) -> Result<Vec<Assignment>> {
        let mut rows = Vec::new();
        for item in self.assignments_tree().iter() {
            let (_, value) = item?;
            rows.push(decode(&value)?);
        }
        Ok(rows)
    }
}
