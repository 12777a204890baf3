//! Dependency bundle threaded through every invocation.

use std::fmt;
use std::sync::Arc;

use crate::storage::StorageAdapter;
use crate::vector::VectorStore;

/// Shared infrastructure handles supplied to tool implementations.
///
/// Constructed once at process startup and threaded into the pipeline; tool
/// authors never build these handles themselves. The handles are owned by an
/// external connection-management collaborator and are only borrowed here.
#[derive(Clone)]
pub struct DependencyBundle {
    storage: Arc<dyn StorageAdapter>,
    vector: Arc<dyn VectorStore>,
}

impl fmt::Debug for DependencyBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DependencyBundle").finish_non_exhaustive()
    }
}

impl DependencyBundle {
    /// Creates a bundle from the supplied handles.
    #[must_use]
    pub fn new(storage: Arc<dyn StorageAdapter>, vector: Arc<dyn VectorStore>) -> Self {
        Self { storage, vector }
    }

    /// Returns the storage adapter handle.
    #[must_use]
    pub fn storage(&self) -> Arc<dyn StorageAdapter> {
        Arc::clone(&self.storage)
    }

    /// Returns the vector store handle.
    #[must_use]
    pub fn vector(&self) -> Arc<dyn VectorStore> {
        Arc::clone(&self.vector)
    }
}
