//! Infrastructure handles injected into tool invocations.
//!
//! The storage adapter and vector store are externally-owned singletons: the
//! runtime never opens or closes their underlying connections, it only
//! threads shared handles into each invocation through the
//! [`DependencyBundle`]. The in-memory implementations here back tests and
//! local runs.

#![warn(missing_docs, clippy::pedantic)]

mod bundle;
mod error;
mod storage;
mod vector;

/// Shared infrastructure handles threaded through every invocation.
pub use bundle::DependencyBundle;
/// Error type and result alias for store operations.
pub use error::{StoreError, StoreResult};
/// Typed-record CRUD seam and the in-memory implementation.
pub use storage::{StorageAdapter, StoredRecord, VolatileStorage};
/// Similarity-search seam and the in-memory implementation.
pub use vector::{Embedding, LocalVectorStore, VectorMatch, VectorPoint, VectorQuery, VectorStore};
