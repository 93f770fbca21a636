//! Classification reads. Rows are written only by the submission transaction.

use super::{decode, Result, Store};
use crate::model::Classification;

impl Store {
    /// All classification rows, in creation order.
    pub fn all_classifications(&self) -> Result<Vec<Classification>> {
        let mut rows = Vec::new();
        for item in self.classifications_tree().iter() {
            let (_, value) = item?;
            rows.push(decode(&value)?);
        }
        Ok(rows)
    }
}
