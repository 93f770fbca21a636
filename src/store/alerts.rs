//! Alert reads. Rows are written only by the submission transaction.

use super::{decode, Result, Store};
use crate::model::Alert;

impl Store {
    /// All alert rows, in creation order.
    pub fn all_alerts(&self) -> Result<Vec<Alert>> {
        let mut rows = Vec::new();
        for item in self.alerts_tree().iter() {
            let (_, value) = item?;
            rows.push(decode(&value)?);
        }
        Ok(rows)
    }
}
