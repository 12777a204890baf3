//! Parameter specifications declared by registered tools.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

const MAX_PARAM_NAME_LEN: usize = 64;

/// Semantic type accepted by a tool parameter.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    /// UTF-8 string value.
    String,
    /// Numeric value (integer or float).
    Number,
    /// Boolean value.
    Boolean,
    /// JSON object.
    Object,
    /// JSON array.
    Array,
    /// Any JSON value; no type check applied.
    Any,
}

impl ParamKind {
    /// Returns true when the supplied JSON value satisfies this kind.
    #[must_use]
    pub fn accepts(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Number => value.is_number(),
            Self::Boolean => value.is_boolean(),
            Self::Object => value.is_object(),
            Self::Array => value.is_array(),
            Self::Any => true,
        }
    }
}

/// One entry in a tool's declared parameter contract.
///
/// Infrastructure parameters (storage and vector handles) are never supplied
/// by callers; the injector satisfies them from the dependency bundle.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ParameterSpec {
    name: String,
    kind: ParamKind,
    required: bool,
    #[serde(default)]
    infrastructure: bool,
}

impl ParameterSpec {
    /// Creates a required caller-facing parameter.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameterSpec`] if the name is empty or too
    /// long.
    pub fn required(name: impl Into<String>, kind: ParamKind) -> Result<Self> {
        Self::new(name, kind, true, false)
    }

    /// Creates an optional caller-facing parameter.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameterSpec`] if the name is empty or too
    /// long.
    pub fn optional(name: impl Into<String>, kind: ParamKind) -> Result<Self> {
        Self::new(name, kind, false, false)
    }

    /// Creates an infrastructure parameter filled from the dependency bundle.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameterSpec`] if the name is empty or too
    /// long.
    pub fn infrastructure(name: impl Into<String>) -> Result<Self> {
        Self::new(name, ParamKind::Any, true, true)
    }

    fn new(name: impl Into<String>, kind: ParamKind, required: bool, infrastructure: bool) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(Error::InvalidParameterSpec {
                reason: "parameter name cannot be empty".into(),
            });
        }
        if name.len() > MAX_PARAM_NAME_LEN {
            return Err(Error::InvalidParameterSpec {
                reason: format!("parameter name length must be <= {MAX_PARAM_NAME_LEN}"),
            });
        }
        Ok(Self {
            name,
            kind,
            required,
            infrastructure,
        })
    }

    /// Returns the parameter name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the semantic type accepted by the parameter.
    #[must_use]
    pub fn kind(&self) -> ParamKind {
        self.kind
    }

    /// Returns true when the parameter must be present before invocation.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Returns true when the parameter is satisfied by the dependency bundle.
    #[must_use]
    pub fn is_infrastructure(&self) -> bool {
        self.infrastructure
    }
}
