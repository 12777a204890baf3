//! Clinical tool registry and secure execution pipeline facade.
//!
//! Depend on this crate via `cargo add medbay`. It bundles the internal
//! runtime crates behind feature flags so downstream users can enable only
//! the components their deployment needs.

#![warn(missing_docs, clippy::pedantic)]

/// Re-export shared primitives for convenience.
pub use medbay_primitives as primitives;

/// Tool descriptor store and name resolution (enabled by `catalog` feature).
#[cfg(feature = "catalog")]
pub use medbay_catalog as catalog;

/// Actor contexts and permission enforcement (enabled by `security` feature).
#[cfg(feature = "security")]
pub use medbay_security as security;

/// Storage and vector store handles (enabled by `stores` feature).
#[cfg(feature = "stores")]
pub use medbay_stores as stores;

/// Invocation auditing and redaction (enabled by `audit` feature).
#[cfg(feature = "audit")]
pub use medbay_audit as audit;

/// Runtime configuration (enabled by `config` feature).
#[cfg(feature = "config")]
pub use medbay_config as config;

/// Execution pipeline and registry facade (enabled by `pipeline` feature).
#[cfg(feature = "pipeline")]
pub use medbay_pipeline as pipeline;
