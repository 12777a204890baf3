//! Core shared types for the Medbay tool runtime.

#![warn(missing_docs, clippy::pedantic)]

mod error;
mod ids;
mod params;
mod permission;

/// Error type and result alias shared across the workspace.
pub use error::{Error, Result};
/// Identity of the actor on whose behalf a tool is invoked.
pub use ids::ActorId;
/// Declared parameter contract for registered tools.
pub use params::{ParamKind, ParameterSpec};
/// Flat capability levels gating tool invocation.
pub use permission::Permission;
