//! Invocation auditing: one redacted record per attempt.
//!
//! Redaction happens before a record reaches any sink, so raw sensitive
//! payloads never leave this crate. Sink failures are recovered locally and
//! surfaced through tracing and a failure counter; they never affect result
//! delivery to the caller.

#![warn(missing_docs, clippy::pedantic)]

mod logger;
mod record;
mod redact;
mod sink;

/// The audit logger composing redaction and sink dispatch.
pub use logger::AuditLogger;
/// Audit record and outcome types.
pub use record::{AuditOutcome, AuditRecord};
/// Sensitive-field redaction.
pub use redact::{REDACTED_PLACEHOLDER, Redactor};
/// Sink seam and bundled implementations.
pub use sink::{AuditError, AuditResult, AuditSink, CompositeSink, MemorySink, TracingSink};
