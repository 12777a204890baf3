//! Runtime configuration for the Medbay tool runtime.
//!
//! Configuration is loaded once at startup from JSON and optionally
//! overridden by `MEDBAY_*` environment variables, then handed to the
//! pipeline as a plain value. Nothing here is re-read at runtime.

#![warn(missing_docs, clippy::pedantic)]

use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use tracing::debug;

const DEFAULT_DEADLINE_MS: u64 = 30_000;

/// Environment variable overriding the per-call deadline in milliseconds.
pub const ENV_DEADLINE_MS: &str = "MEDBAY_DEADLINE_MS";
/// Environment variable overriding sensitive-field patterns (comma-separated).
pub const ENV_SENSITIVE_FIELDS: &str = "MEDBAY_SENSITIVE_FIELDS";

/// Process-wide runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuntimeConfig {
    /// Per-call deadline in milliseconds applied to the invoking step.
    pub deadline_ms: u64,
    /// Field-name patterns redacted from audit records and error payloads.
    pub sensitive_fields: Vec<String>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            deadline_ms: DEFAULT_DEADLINE_MS,
            sensitive_fields: Vec::new(),
        }
    }
}

impl RuntimeConfig {
    /// Parses a configuration from a JSON document.
    ///
    /// # Errors
    ///
    /// Fails when the document is malformed or carries unknown fields, or
    /// when validation rejects the parsed values.
    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(raw).context("failed to parse runtime configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Applies `MEDBAY_*` environment overrides on top of this configuration.
    ///
    /// # Errors
    ///
    /// Fails when an override is present but unparseable, or when the merged
    /// configuration fails validation.
    pub fn with_env_overrides(mut self) -> Result<Self> {
        if let Ok(raw) = std::env::var(ENV_DEADLINE_MS) {
            self.deadline_ms = raw
                .parse()
                .with_context(|| format!("{ENV_DEADLINE_MS} must be an integer, got `{raw}`"))?;
            debug!(deadline_ms = self.deadline_ms, "deadline overridden from environment");
        }
        if let Ok(raw) = std::env::var(ENV_SENSITIVE_FIELDS) {
            self.sensitive_fields = raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
            debug!(
                patterns = self.sensitive_fields.len(),
                "sensitive-field patterns overridden from environment"
            );
        }
        self.validate()?;
        Ok(self)
    }

    /// Returns the per-call deadline as a [`Duration`].
    #[must_use]
    pub fn deadline(&self) -> Duration {
        Duration::from_millis(self.deadline_ms)
    }

    fn validate(&self) -> Result<()> {
        if self.deadline_ms == 0 {
            bail!("deadline_ms must be greater than zero");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = RuntimeConfig::default();
        assert_eq!(config.deadline(), Duration::from_secs(30));
        assert!(config.sensitive_fields.is_empty());
    }

    #[test]
    fn json_round_trip() {
        let config =
            RuntimeConfig::from_json(r#"{"deadline_ms": 500, "sensitive_fields": ["mrn"]}"#)
                .unwrap();
        assert_eq!(config.deadline(), Duration::from_millis(500));
        assert_eq!(config.sensitive_fields, ["mrn"]);
    }

    #[test]
    fn zero_deadline_rejected() {
        let err = RuntimeConfig::from_json(r#"{"deadline_ms": 0}"#).expect_err("should fail");
        assert!(err.to_string().contains("deadline_ms"));
    }

    #[test]
    fn unknown_fields_rejected() {
        let err = RuntimeConfig::from_json(r#"{"deadline": 5}"#).expect_err("should fail");
        assert!(err.to_string().contains("parse"));
    }
}
