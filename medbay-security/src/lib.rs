//! Actor identity resolution and permission enforcement.
//!
//! The permission model is a flat set: an actor either holds a level or it
//! does not. Denials short-circuit the pipeline before dependency injection
//! and are audited as security-relevant events by the caller.

#![warn(missing_docs, clippy::pedantic)]

mod actor;
mod authorize;
mod decision;

/// Per-call actor identity, permission set, and injected defaults.
pub use actor::ActorContext;
/// Authorization seam and the flat-set implementation.
pub use authorize::{Authorizer, FlatPermissionAuthorizer, SecurityError, SecurityResult};
/// Allow/deny outcome of an authorization check.
pub use decision::AccessDecision;
