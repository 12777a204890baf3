//! Shared error definitions for runtime primitives.

use thiserror::Error;

/// Result alias used throughout the Medbay runtime.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while constructing primitive types.
#[derive(Debug, Error)]
pub enum Error {
    /// Actor identifier failed validation.
    #[error("invalid actor id `{id}`: {reason}")]
    InvalidActorId {
        /// The offending identifier string.
        id: String,
        /// Human-readable reason for rejection.
        reason: String,
    },

    /// Parameter specification failed validation.
    #[error("invalid parameter spec: {reason}")]
    InvalidParameterSpec {
        /// Human-readable reason for rejection.
        reason: String,
    },

    /// Permission string did not match a known capability level.
    #[error("unknown permission `{value}`")]
    UnknownPermission {
        /// The unrecognized permission string.
        value: String,
    },
}
