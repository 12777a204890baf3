//! Sensitive-field redaction applied before records reach any sink.

use serde_json::Value;

/// Fixed placeholder substituted for sensitive values.
pub const REDACTED_PLACEHOLDER: &str = "[REDACTED]";

const DEFAULT_PATTERNS: &[&str] = &[
    "ssn",
    "mrn",
    "dob",
    "date_of_birth",
    "patient_id",
    "patient_name",
    "insurance",
];

/// Replaces the value of any field whose name matches a configured pattern.
///
/// Matching is a case-insensitive substring test over field names, applied
/// recursively through objects and arrays. Values themselves are never
/// inspected; the policy is name-driven so it holds equally for success and
/// error payloads.
#[derive(Debug, Clone)]
pub struct Redactor {
    patterns: Vec<String>,
}

impl Default for Redactor {
    fn default() -> Self {
        Self::new(DEFAULT_PATTERNS.iter().map(|s| (*s).to_owned()))
    }
}

impl Redactor {
    /// Creates a redactor from the supplied field-name patterns.
    ///
    /// Patterns are lowercased; empty patterns are dropped.
    #[must_use]
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            patterns: patterns
                .into_iter()
                .map(|p| p.into().to_lowercase())
                .filter(|p| !p.trim().is_empty())
                .collect(),
        }
    }

    /// Returns the configured patterns.
    #[must_use]
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Returns true when the field name matches a sensitive pattern.
    #[must_use]
    pub fn is_sensitive(&self, field: &str) -> bool {
        let field = field.to_lowercase();
        self.patterns.iter().any(|pattern| field.contains(pattern))
    }

    /// Returns a copy of the value with sensitive fields replaced by the
    /// fixed placeholder.
    #[must_use]
    pub fn redact(&self, value: &Value) -> Value {
        match value {
            Value::Object(map) => Value::Object(
                map.iter()
                    .map(|(key, inner)| {
                        let replacement = if self.is_sensitive(key) {
                            Value::String(REDACTED_PLACEHOLDER.to_owned())
                        } else {
                            self.redact(inner)
                        };
                        (key.clone(), replacement)
                    })
                    .collect(),
            ),
            Value::Array(items) => Value::Array(items.iter().map(|item| self.redact(item)).collect()),
            other => other.clone(),
        }
    }
}
