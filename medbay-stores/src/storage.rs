//! Typed-record storage seam and the in-memory implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};

/// One typed record held by the clinical data store.
///
/// The runtime treats the payload as opaque; `kind` partitions records the
/// way a table or collection name would.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord {
    id: Uuid,
    kind: String,
    payload: Value,
}

impl StoredRecord {
    /// Creates a record with a fresh identifier.
    #[must_use]
    pub fn new(kind: impl Into<String>, payload: Value) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: kind.into(),
            payload,
        }
    }

    /// Creates a record with a caller-chosen identifier.
    #[must_use]
    pub fn with_id(id: Uuid, kind: impl Into<String>, payload: Value) -> Self {
        Self {
            id,
            kind: kind.into(),
            payload,
        }
    }

    /// Returns the record identifier.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Returns the record kind.
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Returns the opaque payload.
    #[must_use]
    pub fn payload(&self) -> &Value {
        &self.payload
    }
}

/// Interface for clinical data store adapters.
///
/// Implementations are externally owned; the runtime only asserts the handle
/// exists before injection and never manages its connection lifecycle.
#[async_trait]
pub trait StorageAdapter: Send + Sync {
    /// Creates a record, failing if the identifier is already taken.
    async fn create(&self, record: StoredRecord) -> StoreResult<()>;

    /// Reads a record by kind and identifier.
    async fn read(&self, kind: &str, id: Uuid) -> StoreResult<StoredRecord>;

    /// Replaces an existing record's payload.
    async fn update(&self, record: StoredRecord) -> StoreResult<()>;

    /// Deletes a record by kind and identifier.
    async fn delete(&self, kind: &str, id: Uuid) -> StoreResult<()>;
}

/// In-memory storage adapter for tests and local runs.
#[derive(Debug, Default)]
pub struct VolatileStorage {
    records: RwLock<HashMap<Uuid, StoredRecord>>,
}

impl VolatileStorage {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of records held.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Returns true when no records are held.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl StorageAdapter for VolatileStorage {
    async fn create(&self, record: StoredRecord) -> StoreResult<()> {
        let mut guard = self.records.write().await;
        if guard.contains_key(&record.id()) {
            return Err(StoreError::Conflict { id: record.id() });
        }
        debug!(id = %record.id(), kind = record.kind(), "record created");
        guard.insert(record.id(), record);
        Ok(())
    }

    async fn read(&self, kind: &str, id: Uuid) -> StoreResult<StoredRecord> {
        let guard = self.records.read().await;
        guard
            .get(&id)
            .filter(|record| record.kind() == kind)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                kind: kind.to_owned(),
                id,
            })
    }

    async fn update(&self, record: StoredRecord) -> StoreResult<()> {
        let mut guard = self.records.write().await;
        match guard.get(&record.id()) {
            Some(existing) if existing.kind() == record.kind() => {
                guard.insert(record.id(), record);
                Ok(())
            }
            _ => Err(StoreError::NotFound {
                kind: record.kind().to_owned(),
                id: record.id(),
            }),
        }
    }

    async fn delete(&self, kind: &str, id: Uuid) -> StoreResult<()> {
        let mut guard = self.records.write().await;
        match guard.get(&id) {
            Some(existing) if existing.kind() == kind => {
                guard.remove(&id);
                debug!(id = %id, kind, "record deleted");
                Ok(())
            }
            _ => Err(StoreError::NotFound {
                kind: kind.to_owned(),
                id,
            }),
        }
    }
}
