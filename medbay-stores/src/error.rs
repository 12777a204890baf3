//! Error types for store handles.

use thiserror::Error;
use uuid::Uuid;

/// Errors emitted by storage and vector store implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No record exists under the supplied identifier.
    #[error("record `{id}` of kind `{kind}` not found")]
    NotFound {
        /// Record kind that was queried.
        kind: String,
        /// The missing identifier.
        id: Uuid,
    },

    /// A record under the supplied identifier already exists.
    #[error("record `{id}` already exists")]
    Conflict {
        /// The conflicting identifier.
        id: Uuid,
    },

    /// Embedding or record payload failed validation.
    #[error("invalid store input: {reason}")]
    InvalidInput {
        /// Human-readable reason for rejection.
        reason: String,
    },

    /// The backing service reported an application error.
    #[error("store backend failure: {reason}")]
    Backend {
        /// Human-readable reason describing the failure.
        reason: String,
    },
}

impl StoreError {
    /// Constructs a backend error from a string-like reason.
    #[must_use]
    pub fn backend(reason: impl Into<String>) -> Self {
        Self::Backend {
            reason: reason.into(),
        }
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
