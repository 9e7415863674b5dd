//! Record operation errors.

use thiserror::Error;
use uuid::Uuid;

use crate::storage::StorageError;

/// Errors surfaced by record operations and the attachment lifecycle.
#[derive(Debug, Error)]
pub enum RecordError {
    /// A carrier with the same `(name, taxCode)` pair already exists.
    #[error("duplicate carrier: {0}")]
    Conflict(String),

    /// Record not found.
    #[error("record not found: {0}")]
    NotFound(Uuid),

    /// Blob storage operation failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Metadata read/write failed.
    #[error("persistence error: {0}")]
    Persistence(String),
}

impl RecordError {
    /// Create a conflict error.
    #[must_use]
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    /// Create a not found error.
    #[must_use]
    pub fn not_found(id: Uuid) -> Self {
        Self::NotFound(id)
    }

    /// Create a persistence error.
    #[must_use]
    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::Persistence(msg.into())
    }
}
