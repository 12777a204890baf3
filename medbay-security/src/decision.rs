//! Authorization decisions.

use serde::{Deserialize, Serialize};

/// Outcome of an authorization check.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AccessDecision {
    /// The actor may invoke the tool.
    Allow,
    /// The actor is rejected with an explanatory reason.
    Deny {
        /// Human-readable reason surfaced in the audit record.
        reason: String,
    },
}

impl AccessDecision {
    /// Returns an allow decision.
    #[must_use]
    pub fn allow() -> Self {
        Self::Allow
    }

    /// Returns a deny decision with the supplied reason.
    #[must_use]
    pub fn deny(reason: impl Into<String>) -> Self {
        Self::Deny {
            reason: reason.into(),
        }
    }

    /// Returns true when the decision permits the invocation.
    #[must_use]
    pub fn is_allow(&self) -> bool {
        matches!(self, Self::Allow)
    }

    /// Returns the denial reason, if denied.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Allow => None,
            Self::Deny { reason } => Some(reason),
        }
    }
}
