//! Audit record structure.

use chrono::{DateTime, Utc};
use medbay_primitives::ActorId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Outcome kind recorded for one invocation attempt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AuditOutcome {
    /// Invocation completed and returned a payload.
    Success,
    /// Authorization rejected the invocation before injection.
    Denied,
    /// Invocation failed with the supplied stable error kind.
    Failed {
        /// Stable error kind label (e.g. `unknown_tool`, `timeout`).
        kind: String,
    },
}

impl AuditOutcome {
    /// Returns a failed outcome carrying the supplied kind label.
    #[must_use]
    pub fn failed(kind: impl Into<String>) -> Self {
        Self::Failed { kind: kind.into() }
    }

    /// Returns the stable label for the outcome.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Success => "success",
            Self::Denied => "denied",
            Self::Failed { kind } => kind,
        }
    }
}

/// One redacted audit record, emitted exactly once per invocation attempt.
///
/// Records are recorded under the canonical tool name; the name the caller
/// actually used is preserved in `requested_as` when it differs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    invocation_id: Uuid,
    actor_id: ActorId,
    tool: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    requested_as: Option<String>,
    #[serde(flatten)]
    outcome: AuditOutcome,
    started_at: DateTime<Utc>,
    duration_ms: u64,
    arguments: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
}

impl AuditRecord {
    /// Creates a record for one completed invocation attempt.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        invocation_id: Uuid,
        actor_id: ActorId,
        tool: impl Into<String>,
        outcome: AuditOutcome,
        started_at: DateTime<Utc>,
        duration_ms: u64,
        arguments: Value,
    ) -> Self {
        Self {
            invocation_id,
            actor_id,
            tool: tool.into(),
            requested_as: None,
            outcome,
            started_at,
            duration_ms,
            arguments,
            result: None,
        }
    }

    /// Preserves the originally requested alias when it differs from the
    /// canonical name.
    #[must_use]
    pub fn with_requested_as(mut self, requested: impl Into<String>) -> Self {
        self.requested_as = Some(requested.into());
        self
    }

    /// Attaches the (already redacted) result payload.
    #[must_use]
    pub fn with_result(mut self, result: Value) -> Self {
        self.result = Some(result);
        self
    }

    /// Returns the invocation identifier.
    #[must_use]
    pub fn invocation_id(&self) -> Uuid {
        self.invocation_id
    }

    /// Returns the acting identity.
    #[must_use]
    pub fn actor_id(&self) -> &ActorId {
        &self.actor_id
    }

    /// Returns the canonical tool name.
    #[must_use]
    pub fn tool(&self) -> &str {
        &self.tool
    }

    /// Returns the alias the caller used, if it differed from the canonical
    /// name.
    #[must_use]
    pub fn requested_as(&self) -> Option<&str> {
        self.requested_as.as_deref()
    }

    /// Returns the outcome kind.
    #[must_use]
    pub fn outcome(&self) -> &AuditOutcome {
        &self.outcome
    }

    /// Returns when the invocation started.
    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Returns the wall-clock duration in milliseconds.
    #[must_use]
    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    /// Returns the redacted argument view.
    #[must_use]
    pub fn arguments(&self) -> &Value {
        &self.arguments
    }

    /// Returns the redacted result view, if any.
    #[must_use]
    pub fn result(&self) -> Option<&Value> {
        self.result.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn outcome_labels_are_stable() {
        assert_eq!(AuditOutcome::Success.label(), "success");
        assert_eq!(AuditOutcome::Denied.label(), "denied");
        assert_eq!(AuditOutcome::failed("timeout").label(), "timeout");
    }

    #[test]
    fn record_serializes_with_flattened_outcome() {
        let record = AuditRecord::new(
            Uuid::new_v4(),
            ActorId::new("nurse-7").unwrap(),
            "records.search",
            AuditOutcome::Denied,
            Utc::now(),
            3,
            json!({"query": "hypertension"}),
        )
        .with_requested_as("search_records");

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["outcome"], "denied");
        assert_eq!(value["requested_as"], "search_records");
        assert_eq!(value["tool"], "records.search");
    }
}
