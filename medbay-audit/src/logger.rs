//! Audit logger composing redaction and sink dispatch.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::Value;
use tracing::warn;

use crate::record::AuditRecord;
use crate::redact::Redactor;
use crate::sink::AuditSink;

/// Records every invocation attempt, redacted, exactly once.
///
/// Sink failures are recovered here: the record is dropped for that sink,
/// a warning is emitted, and the failure counter is bumped so an
/// operational-health collaborator can alarm on it. The caller's result
/// delivery is never blocked or rolled back.
pub struct AuditLogger {
    redactor: Redactor,
    sink: Arc<dyn AuditSink>,
    sink_failures: AtomicU64,
}

impl fmt::Debug for AuditLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuditLogger")
            .field("patterns", &self.redactor.patterns())
            .field("sink_failures", &self.sink_failures.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl AuditLogger {
    /// Creates a logger with the supplied redactor and sink.
    #[must_use]
    pub fn new(redactor: Redactor, sink: Arc<dyn AuditSink>) -> Self {
        Self {
            redactor,
            sink,
            sink_failures: AtomicU64::new(0),
        }
    }

    /// Returns a logger applying the supplied redactor, keeping the existing
    /// sink. The failure counter starts fresh.
    #[must_use]
    pub fn with_redactor(&self, redactor: Redactor) -> Self {
        Self {
            redactor,
            sink: Arc::clone(&self.sink),
            sink_failures: AtomicU64::new(0),
        }
    }

    /// Returns a redacted copy of the supplied payload.
    ///
    /// Exposed so the pipeline can redact result envelopes with the same
    /// policy applied to audit records.
    #[must_use]
    pub fn redact(&self, value: &Value) -> Value {
        self.redactor.redact(value)
    }

    /// Accepts one record, redacting argument and result views before any
    /// sink sees them.
    pub async fn record(&self, record: AuditRecord) {
        let redacted_args = self.redactor.redact(record.arguments());
        let redacted_result = record.result().map(|value| self.redactor.redact(value));

        let mut redacted = AuditRecord::new(
            record.invocation_id(),
            record.actor_id().clone(),
            record.tool(),
            record.outcome().clone(),
            record.started_at(),
            record.duration_ms(),
            redacted_args,
        );
        if let Some(requested) = record.requested_as() {
            redacted = redacted.with_requested_as(requested);
        }
        if let Some(result) = redacted_result {
            redacted = redacted.with_result(result);
        }

        if let Err(err) = self.sink.accept(&redacted).await {
            self.sink_failures.fetch_add(1, Ordering::Relaxed);
            warn!(
                invocation = %redacted.invocation_id(),
                tool = redacted.tool(),
                error = %err,
                "audit sink rejected record"
            );
        }
    }

    /// Returns how many records failed sink delivery since startup.
    #[must_use]
    pub fn sink_failures(&self) -> u64 {
        self.sink_failures.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::AuditOutcome;
    use crate::redact::REDACTED_PLACEHOLDER;
    use crate::sink::{AuditError, AuditResult, MemorySink};
    use async_trait::async_trait;
    use chrono::Utc;
    use medbay_primitives::ActorId;
    use serde_json::json;
    use uuid::Uuid;

    fn record_with_args(args: Value) -> AuditRecord {
        AuditRecord::new(
            Uuid::new_v4(),
            ActorId::new("nurse-7").unwrap(),
            "records.search",
            AuditOutcome::Success,
            Utc::now(),
            5,
            args,
        )
    }

    struct FailingSink;

    #[async_trait]
    impl AuditSink for FailingSink {
        async fn accept(&self, _record: &AuditRecord) -> AuditResult<()> {
            Err(AuditError::unavailable("unreachable"))
        }
    }

    #[tokio::test]
    async fn arguments_redacted_before_sink() {
        let sink = Arc::new(MemorySink::new());
        let logger = AuditLogger::new(Redactor::default(), Arc::clone(&sink) as Arc<dyn AuditSink>);

        logger
            .record(record_with_args(json!({"patient_id": "P-1", "query": "bp"})))
            .await;

        let records = sink.records().await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].arguments()["patient_id"], REDACTED_PLACEHOLDER);
        assert_eq!(records[0].arguments()["query"], "bp");
    }

    #[tokio::test]
    async fn result_payload_redacted_too() {
        let sink = Arc::new(MemorySink::new());
        let logger = AuditLogger::new(Redactor::default(), Arc::clone(&sink) as Arc<dyn AuditSink>);

        let record = record_with_args(json!({})).with_result(json!({"mrn": "A1", "count": 2}));
        logger.record(record).await;

        let records = sink.records().await;
        let result = records[0].result().unwrap();
        assert_eq!(result["mrn"], REDACTED_PLACEHOLDER);
        assert_eq!(result["count"], 2);
    }

    #[tokio::test]
    async fn with_redactor_swaps_patterns_and_keeps_sink() {
        let sink = Arc::new(MemorySink::new());
        let logger =
            AuditLogger::new(Redactor::default(), Arc::clone(&sink) as Arc<dyn AuditSink>);
        let logger = logger.with_redactor(Redactor::new(["visit_code"]));

        logger
            .record(record_with_args(json!({"visit_code": "V-1", "ssn": "now visible"})))
            .await;

        let records = sink.records().await;
        assert_eq!(records[0].arguments()["visit_code"], REDACTED_PLACEHOLDER);
        assert_eq!(records[0].arguments()["ssn"], "now visible");
    }

    #[tokio::test]
    async fn sink_failure_counted_not_propagated() {
        let logger = AuditLogger::new(Redactor::default(), Arc::new(FailingSink));
        logger.record(record_with_args(json!({}))).await;
        logger.record(record_with_args(json!({}))).await;
        assert_eq!(logger.sink_failures(), 2);
    }
}
