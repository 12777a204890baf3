//! Audit sinks receiving redacted records.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::info;

use crate::record::AuditRecord;

/// Errors surfaced by audit sinks.
#[derive(Debug, Error)]
pub enum AuditError {
    /// The sink could not accept the record.
    #[error("audit sink unavailable: {reason}")]
    SinkUnavailable {
        /// Human-readable reason for operators.
        reason: String,
    },
}

impl AuditError {
    /// Constructs a sink-unavailable error from a string-like reason.
    #[must_use]
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::SinkUnavailable {
            reason: reason.into(),
        }
    }
}

/// Result alias for sink operations.
pub type AuditResult<T> = Result<T, AuditError>;

/// Trait implemented by audit record consumers.
///
/// Sinks receive records already redacted; they must not assume access to
/// raw payloads.
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Accepts one redacted audit record.
    async fn accept(&self, record: &AuditRecord) -> AuditResult<()>;
}

/// Sink that emits records as structured tracing events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

#[async_trait]
impl AuditSink for TracingSink {
    async fn accept(&self, record: &AuditRecord) -> AuditResult<()> {
        info!(
            invocation = %record.invocation_id(),
            actor = %record.actor_id(),
            tool = record.tool(),
            requested_as = record.requested_as().unwrap_or_default(),
            outcome = record.outcome().label(),
            duration_ms = record.duration_ms(),
            "tool invocation audited"
        );
        Ok(())
    }
}

/// Sink that retains records in memory, for tests and local inspection.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<AuditRecord>>,
}

impl MemorySink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of all records accepted so far.
    pub async fn records(&self) -> Vec<AuditRecord> {
        self.records.lock().await.clone()
    }

    /// Returns the number of records accepted so far.
    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    /// Returns true when no records have been accepted.
    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }
}

#[async_trait]
impl AuditSink for MemorySink {
    async fn accept(&self, record: &AuditRecord) -> AuditResult<()> {
        self.records.lock().await.push(record.clone());
        Ok(())
    }
}

/// Sink that forwards each record to a collection of sinks.
pub struct CompositeSink {
    sinks: Vec<Arc<dyn AuditSink>>,
}

impl CompositeSink {
    /// Creates a composite sink from the supplied list.
    #[must_use]
    pub fn new<I>(sinks: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn AuditSink>>,
    {
        Self {
            sinks: sinks.into_iter().collect(),
        }
    }

    /// Adds a sink to the composite set.
    pub fn push(&mut self, sink: Arc<dyn AuditSink>) {
        self.sinks.push(sink);
    }
}

#[async_trait]
impl AuditSink for CompositeSink {
    async fn accept(&self, record: &AuditRecord) -> AuditResult<()> {
        let mut first_failure = None;
        for sink in &self.sinks {
            if let Err(err) = sink.accept(record).await {
                first_failure.get_or_insert(err);
            }
        }
        match first_failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::AuditOutcome;
    use chrono::Utc;
    use medbay_primitives::ActorId;
    use serde_json::json;
    use uuid::Uuid;

    fn record() -> AuditRecord {
        AuditRecord::new(
            Uuid::new_v4(),
            ActorId::new("nurse-7").unwrap(),
            "records.search",
            AuditOutcome::Success,
            Utc::now(),
            12,
            json!({}),
        )
    }

    struct FailingSink;

    #[async_trait]
    impl AuditSink for FailingSink {
        async fn accept(&self, _record: &AuditRecord) -> AuditResult<()> {
            Err(AuditError::unavailable("disk full"))
        }
    }

    #[tokio::test]
    async fn memory_sink_retains_records() {
        let sink = MemorySink::new();
        sink.accept(&record()).await.unwrap();
        sink.accept(&record()).await.unwrap();
        assert_eq!(sink.len().await, 2);
    }

    #[tokio::test]
    async fn composite_delivers_to_all_despite_failure() {
        let memory = Arc::new(MemorySink::new());
        let composite = CompositeSink::new([
            Arc::new(FailingSink) as Arc<dyn AuditSink>,
            Arc::clone(&memory) as Arc<dyn AuditSink>,
        ]);

        let err = composite.accept(&record()).await.expect_err("first sink fails");
        assert!(matches!(err, AuditError::SinkUnavailable { .. }));
        assert_eq!(memory.len().await, 1, "later sinks still receive the record");
    }
}
