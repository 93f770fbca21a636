//! Embedded persistence layer.
//!
//! One sled tree per entity. Keys are big-endian ids (or composite
//! student/assignment prefixes) so prefix scans give insertion order.
//! The declaration uniqueness constraint and the submission write are
//! enforced in [`declarations`] via a multi-tree transaction.

mod alerts;
mod assignments;
mod classifications;
mod declarations;
mod logs;

pub use assignments::DEFAULT_ASSIGNMENTS;
pub use declarations::SubmissionRecord;
pub use logs::LogFilter;

use std::path::Path;

use thiserror::Error;

/// Errors from store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A declaration already exists for this (student, assignment) pair.
    #[error("declaration already exists for this assignment")]
    DuplicateDeclaration,

    /// A stored record failed to encode or decode.
    #[error("codec error: {0}")]
    Codec(#[from] serde_json::Error),

    /// Underlying sled error.
    #[error(transparent)]
    Backend(#[from] sled::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Handle to the embedded database and its entity trees.
pub struct Store {
    db: sled::Db,
    logs: sled::Tree,
    declarations: sled::Tree,
    classifications: sled::Tree,
    alerts: sled::Tree,
    assignments: sled::Tree,
}

impl Store {
    /// Open (or create) the database under `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = sled::open(path)?;
        Ok(Self {
            logs: db.open_tree("logs")?,
            declarations: db.open_tree("declarations")?,
            classifications: db.open_tree("classifications")?,
            alerts: db.open_tree("alerts")?,
            assignments: db.open_tree("assignments")?,
            db,
        })
    }

    /// Allocate a fresh id. Monotonic per database.
    pub fn next_id(&self) -> Result<u64> {
        Ok(self.db.generate_id()?)
    }

    pub(crate) fn logs_tree(&self) -> &sled::Tree {
        &self.logs
    }

    pub(crate) fn declarations_tree(&self) -> &sled::Tree {
        &self.declarations
    }

    pub(crate) fn classifications_tree(&self) -> &sled::Tree {
        &self.classifications
    }

    pub(crate) fn alerts_tree(&self) -> &sled::Tree {
        &self.alerts
    }

    pub(crate) fn assignments_tree(&self) -> &sled::Tree {
        &self.assignments
    }
}

/// Big-endian key for a single id.
pub(crate) fn id_key(id: u64) -> [u8; 8] {
    id.to_be_bytes()
}

/// Composite key prefix for a (student, assignment) pair.
pub(crate) fn student_assignment_key(student_id: u64, assignment_id: u64) -> [u8; 16] {
    let mut key = [0u8; 16];
    key[..8].copy_from_slice(&student_id.to_be_bytes());
    key[8..].copy_from_slice(&assignment_id.to_be_bytes());
    key
}

/// Decode a stored JSON value.
pub(crate) fn decode<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    Ok(serde_json::from_slice(bytes)?)
}
