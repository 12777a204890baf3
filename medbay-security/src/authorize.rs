//! Authorization seam and the default flat-set implementation.

use async_trait::async_trait;
use medbay_primitives::Permission;
use thiserror::Error;
use tracing::{debug, warn};

use crate::actor::ActorContext;
use crate::decision::AccessDecision;

/// Errors surfaced by authorizer backends.
#[derive(Debug, Error)]
pub enum SecurityError {
    /// An external authorization backend failed to answer.
    #[error("authorization backend failure: {reason}")]
    Backend {
        /// Human-readable explanation for operators.
        reason: String,
    },
}

/// Result alias for authorization operations.
pub type SecurityResult<T> = Result<T, SecurityError>;

/// Trait implemented by authorization engines.
///
/// The default implementation is a pure in-memory check, but the seam allows
/// an external policy service to be substituted without touching the
/// pipeline.
#[async_trait]
pub trait Authorizer: Send + Sync {
    /// Decides whether the actor may invoke a tool requiring the supplied
    /// permission.
    async fn authorize(
        &self,
        tool: &str,
        required: Permission,
        actor: &ActorContext,
    ) -> SecurityResult<AccessDecision>;
}

/// Strict flat-set authorizer: the actor's permission set must contain the
/// required level, except [`Permission::None`] which always passes. No
/// implicit elevation, no inheritance between levels.
#[derive(Debug, Default, Clone, Copy)]
pub struct FlatPermissionAuthorizer;

#[async_trait]
impl Authorizer for FlatPermissionAuthorizer {
    async fn authorize(
        &self,
        tool: &str,
        required: Permission,
        actor: &ActorContext,
    ) -> SecurityResult<AccessDecision> {
        if actor.holds(required) {
            debug!(actor = %actor.actor_id(), tool, required = %required, "access allowed");
            return Ok(AccessDecision::allow());
        }
        warn!(actor = %actor.actor_id(), tool, required = %required, "access denied");
        Ok(AccessDecision::deny(format!(
            "actor `{}` lacks required permission `{required}`",
            actor.actor_id()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medbay_primitives::ActorId;

    fn actor(id: &str) -> ActorContext {
        ActorContext::new(ActorId::new(id).expect("valid id"))
    }

    #[tokio::test]
    async fn required_none_always_passes() {
        let authorizer = FlatPermissionAuthorizer;
        let decision = authorizer
            .authorize("vitals.compute", Permission::None, &actor("guest"))
            .await
            .unwrap();
        assert!(decision.is_allow());
    }

    #[tokio::test]
    async fn missing_level_denied_with_reason() {
        let authorizer = FlatPermissionAuthorizer;
        let reader = actor("nurse-7").with_permission(Permission::Read);
        let decision = authorizer
            .authorize("records.update", Permission::Write, &reader)
            .await
            .unwrap();
        assert!(!decision.is_allow());
        assert!(decision.reason().unwrap().contains("write"));
    }

    #[tokio::test]
    async fn levels_do_not_inherit() {
        let authorizer = FlatPermissionAuthorizer;
        let admin = actor("chief").with_permission(Permission::Admin);
        let decision = authorizer
            .authorize("records.update", Permission::Write, &admin)
            .await
            .unwrap();
        assert!(!decision.is_allow(), "admin does not imply write");
    }
}
