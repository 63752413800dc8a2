//! Record store
//!
//! Keyed record operations (read, find, upsert, delete) over a sheet resource.

mod record_store;

pub use record_store::RecordStore;

use serde::Serialize;
use thiserror::Error;

use crate::sheet::ResourceError;

/// Record store error types
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Sheet could not be read: {0}")]
    ResourceUnavailable(#[source] ResourceError),

    #[error("Key field '{0}' is missing or empty")]
    MissingKey(String),

    #[error("Sheet could not be written: {0}")]
    WriteFailed(#[source] ResourceError),
}

/// Result type for record store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// What an upsert did to the sheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum UpsertOutcome {
    /// The sheet was empty; a header and the first row were written
    Created,
    /// No record had the key; the record was appended
    Inserted,
    /// The old row was removed and the merged row appended
    Replaced,
    /// Removing the old row failed; the merged row was appended anyway and
    /// the key now appears twice
    DuplicateKept { reason: String },
}

impl UpsertOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpsertOutcome::Created => "created",
            UpsertOutcome::Inserted => "inserted",
            UpsertOutcome::Replaced => "updated",
            UpsertOutcome::DuplicateKept { .. } => "duplicate_kept",
        }
    }

    /// Whether an earlier record with the same key existed
    pub fn is_update(&self) -> bool {
        matches!(
            self,
            UpsertOutcome::Replaced | UpsertOutcome::DuplicateKept { .. }
        )
    }
}
