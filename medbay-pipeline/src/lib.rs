//! Secure execution pipeline and registry facade.
//!
//! Every caller — direct, RPC adapter, or agent framework — goes through
//! [`ToolHub::invoke`]: resolution, authorization, argument injection,
//! deadline-bounded execution, result normalization, and auditing, in that
//! order. No failure escapes as a raw error; callers always receive a
//! [`ResultEnvelope`] with a stable error kind.

#![warn(missing_docs, clippy::pedantic)]

mod envelope;
mod hub;
mod inject;

/// Normalized result shape returned to every caller.
pub use envelope::{ErrorKind, InvocationStatus, ResultEnvelope};
/// The registry facade composing catalog, security, injection, and audit.
pub use hub::ToolHub;
/// Argument assembly applied before invocation.
pub use inject::{InjectError, assemble_arguments};
