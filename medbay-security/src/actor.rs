//! Actor context carried through every invocation.

use std::collections::BTreeSet;

use medbay_primitives::{ActorId, Permission};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identity of the entity making a call.
///
/// Created per call or per session and never persisted by the registry. The
/// permission set is flat; any richer role model is materialized into it by
/// the identity collaborator before the context reaches the runtime.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActorContext {
    actor_id: ActorId,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    permissions: BTreeSet<Permission>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    injected_params: Map<String, Value>,
}

impl ActorContext {
    /// Creates a context with no permissions and no injected defaults.
    #[must_use]
    pub fn new(actor_id: ActorId) -> Self {
        Self {
            actor_id,
            permissions: BTreeSet::new(),
            injected_params: Map::new(),
        }
    }

    /// Grants a permission level to the actor.
    ///
    /// [`Permission::None`] is the absence of a requirement, not a grantable
    /// level, and is ignored.
    #[must_use]
    pub fn with_permission(mut self, permission: Permission) -> Self {
        if permission != Permission::None {
            self.permissions.insert(permission);
        }
        self
    }

    /// Grants multiple permission levels.
    #[must_use]
    pub fn with_permissions<I>(mut self, permissions: I) -> Self
    where
        I: IntoIterator<Item = Permission>,
    {
        for permission in permissions {
            self = self.with_permission(permission);
        }
        self
    }

    /// Attaches a process-scoped default merged into every call the actor
    /// makes, keyed by parameter name.
    #[must_use]
    pub fn with_injected_param(mut self, name: impl Into<String>, value: Value) -> Self {
        self.injected_params.insert(name.into(), value);
        self
    }

    /// Returns the actor identifier.
    #[must_use]
    pub fn actor_id(&self) -> &ActorId {
        &self.actor_id
    }

    /// Returns the flat permission set held by the actor.
    #[must_use]
    pub fn permissions(&self) -> &BTreeSet<Permission> {
        &self.permissions
    }

    /// Returns true when the actor holds the supplied level.
    #[must_use]
    pub fn holds(&self, permission: Permission) -> bool {
        permission == Permission::None || self.permissions.contains(&permission)
    }

    /// Returns the actor-level injected defaults.
    #[must_use]
    pub fn injected_params(&self) -> &Map<String, Value> {
        &self.injected_params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn actor(id: &str) -> ActorContext {
        ActorContext::new(ActorId::new(id).expect("valid id"))
    }

    #[test]
    fn holds_checks_flat_set() {
        let ctx = actor("nurse-7").with_permission(Permission::Read);
        assert!(ctx.holds(Permission::Read));
        assert!(!ctx.holds(Permission::Write));
        assert!(!ctx.holds(Permission::Admin));
    }

    #[test]
    fn none_always_held() {
        let ctx = actor("guest");
        assert!(ctx.holds(Permission::None));
    }

    #[test]
    fn none_is_not_grantable() {
        let ctx = actor("guest").with_permission(Permission::None);
        assert!(ctx.permissions().is_empty());
    }

    #[test]
    fn injected_params_keyed_by_name() {
        let ctx = actor("svc.reports").with_injected_param("author", json!("svc.reports"));
        assert_eq!(ctx.injected_params().get("author"), Some(&json!("svc.reports")));
    }
}
