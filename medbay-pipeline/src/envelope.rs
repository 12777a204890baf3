//! Normalized result envelope shared by all callers.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Stable error classification carried in failure envelopes.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Requested name matched neither a canonical name nor an alias.
    UnknownTool,
    /// Registration collided with an existing name.
    DuplicateName,
    /// Authorization denied the invocation.
    Forbidden,
    /// A required parameter had no caller value and no default.
    MissingParameter,
    /// The tool implementation itself failed.
    ToolError,
    /// The implementation did not complete within the per-call deadline.
    Timeout,
    /// An audit sink could not accept a record (non-fatal, surfaced to
    /// operational monitoring).
    AuditSinkUnavailable,
}

impl ErrorKind {
    /// Returns the stable wire label for this kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UnknownTool => "unknown_tool",
            Self::DuplicateName => "duplicate_name",
            Self::Forbidden => "forbidden",
            Self::MissingParameter => "missing_parameter",
            Self::ToolError => "tool_error",
            Self::Timeout => "timeout",
            Self::AuditSinkUnavailable => "audit_sink_unavailable",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Success or error marker on the envelope.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvocationStatus {
    /// Invocation completed; the payload carries the tool's result.
    Success,
    /// Invocation failed; `error_kind` and `message` describe why.
    Error,
}

/// The uniform result shape returned to every caller regardless of
/// transport or tool implementation style.
///
/// Failures never carry stack traces or implementation detail, only the
/// stable kind and a short message.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResultEnvelope {
    status: InvocationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    payload: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error_kind: Option<ErrorKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl ResultEnvelope {
    /// Wraps a successful tool result.
    #[must_use]
    pub fn success(payload: Value) -> Self {
        Self {
            status: InvocationStatus::Success,
            payload: Some(payload),
            error_kind: None,
            message: None,
        }
    }

    /// Wraps a failure with its stable kind and a short message.
    #[must_use]
    pub fn error(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            status: InvocationStatus::Error,
            payload: None,
            error_kind: Some(kind),
            message: Some(message.into()),
        }
    }

    /// Returns the status marker.
    #[must_use]
    pub fn status(&self) -> InvocationStatus {
        self.status
    }

    /// Returns true when the invocation succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == InvocationStatus::Success
    }

    /// Returns the success payload, if any.
    #[must_use]
    pub fn payload(&self) -> Option<&Value> {
        self.payload.as_ref()
    }

    /// Returns the error kind, if the invocation failed.
    #[must_use]
    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.error_kind
    }

    /// Returns the failure message, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}
