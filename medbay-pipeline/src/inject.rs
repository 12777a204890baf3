//! Argument assembly: caller values, actor defaults, fail-fast validation.

use medbay_primitives::{ParamKind, ParameterSpec};
use medbay_security::ActorContext;
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors produced during argument assembly, all surfaced before the tool
/// implementation runs.
#[derive(Debug, Error)]
pub enum InjectError {
    /// A required parameter had no caller value and no actor default.
    #[error("missing required parameter `{name}`")]
    MissingParameter {
        /// Name of the absent parameter.
        name: String,
    },

    /// A supplied value did not match the declared semantic type.
    #[error("parameter `{name}` expects {expected}")]
    TypeMismatch {
        /// Name of the offending parameter.
        name: String,
        /// Human-readable expected type.
        expected: &'static str,
    },
}

fn kind_label(kind: ParamKind) -> &'static str {
    match kind {
        ParamKind::String => "a string",
        ParamKind::Number => "a number",
        ParamKind::Boolean => "a boolean",
        ParamKind::Object => "an object",
        ParamKind::Array => "an array",
        ParamKind::Any => "any value",
    }
}

/// Assembles the final argument map for one invocation.
///
/// Precedence per parameter: explicit caller value first, then the actor's
/// injected defaults. Infrastructure parameters are skipped here — the
/// storage and vector handles ride the tool context, supplied by the
/// dependency bundle rather than the argument map. An explicit JSON `null`
/// counts as absent. The caller's map is never mutated.
///
/// # Errors
///
/// Returns [`InjectError::MissingParameter`] when a required parameter has
/// no value from any source, and [`InjectError::TypeMismatch`] when a value
/// fails the declared type check. Both fire before the tool body runs.
pub fn assemble_arguments(
    parameters: &[ParameterSpec],
    caller: &Map<String, Value>,
    actor: &ActorContext,
) -> Result<Map<String, Value>, InjectError> {
    let mut assembled = caller.clone();

    for spec in parameters {
        if spec.is_infrastructure() {
            continue;
        }

        let supplied = assembled.get(spec.name()).filter(|value| !value.is_null());
        match supplied {
            Some(value) => {
                if !spec.kind().accepts(value) {
                    return Err(InjectError::TypeMismatch {
                        name: spec.name().to_owned(),
                        expected: kind_label(spec.kind()),
                    });
                }
            }
            None => {
                if let Some(default) = actor.injected_params().get(spec.name()) {
                    if !spec.kind().accepts(default) {
                        return Err(InjectError::TypeMismatch {
                            name: spec.name().to_owned(),
                            expected: kind_label(spec.kind()),
                        });
                    }
                    assembled.insert(spec.name().to_owned(), default.clone());
                } else if spec.is_required() {
                    return Err(InjectError::MissingParameter {
                        name: spec.name().to_owned(),
                    });
                }
            }
        }
    }

    Ok(assembled)
}
