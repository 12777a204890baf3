//! Tool descriptors and the executor contract.

use std::collections::BTreeSet;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use medbay_primitives::{ActorId, ParameterSpec, Permission};
use medbay_stores::{StorageAdapter, VectorStore};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::CatalogError;

const MAX_TOOL_NAME_LEN: usize = 96;

/// Result alias for tool implementations.
pub type ToolResult<T> = Result<T, ToolError>;

/// Error returned by a tool implementation.
///
/// This is the only failure a tool body may surface; the pipeline captures
/// it at the invocation boundary and converts it into a normalized envelope.
#[derive(Debug, Error)]
#[error("tool execution failed: {reason}")]
pub struct ToolError {
    /// Human-readable reason reported by the implementation.
    reason: String,
}

impl ToolError {
    /// Creates a tool error from the supplied reason.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// Returns the failure reason.
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// Everything a tool body receives for one invocation.
///
/// The argument map is fully assembled by the injector (caller values first,
/// then actor-level defaults); the storage and vector handles come from the
/// process-wide dependency bundle. Tool authors never construct these
/// handles themselves.
#[derive(Clone)]
pub struct ToolContext {
    args: Map<String, Value>,
    storage: Arc<dyn StorageAdapter>,
    vector: Arc<dyn VectorStore>,
    actor_id: ActorId,
}

impl ToolContext {
    /// Assembles a context for one invocation.
    #[must_use]
    pub fn new(
        args: Map<String, Value>,
        storage: Arc<dyn StorageAdapter>,
        vector: Arc<dyn VectorStore>,
        actor_id: ActorId,
    ) -> Self {
        Self {
            args,
            storage,
            vector,
            actor_id,
        }
    }

    /// Returns the assembled argument map.
    #[must_use]
    pub fn args(&self) -> &Map<String, Value> {
        &self.args
    }

    /// Returns one argument by name.
    #[must_use]
    pub fn arg(&self, name: &str) -> Option<&Value> {
        self.args.get(name)
    }

    /// Returns the clinical data store handle.
    #[must_use]
    pub fn storage(&self) -> Arc<dyn StorageAdapter> {
        Arc::clone(&self.storage)
    }

    /// Returns the vector store handle.
    #[must_use]
    pub fn vector(&self) -> Arc<dyn VectorStore> {
        Arc::clone(&self.vector)
    }

    /// Returns the identity the invocation runs on behalf of.
    #[must_use]
    pub fn actor_id(&self) -> &ActorId {
        &self.actor_id
    }
}

/// Trait implemented by tool executors.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Executes the tool against the supplied invocation context.
    async fn call(&self, ctx: ToolContext) -> ToolResult<Value>;
}

#[async_trait]
impl<F, Fut> Tool for F
where
    F: Send + Sync + Fn(ToolContext) -> Fut,
    Fut: Future<Output = ToolResult<Value>> + Send,
{
    async fn call(&self, ctx: ToolContext) -> ToolResult<Value> {
        (self)(ctx).await
    }
}

/// Identity and contract of one registered tool.
///
/// The canonical name is immutable once registered. Aliases let multiple
/// external naming conventions address the same implementation; callers
/// using any recognized name observe identical behavior and identical audit
/// entries recorded under the canonical name.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    canonical_name: String,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    aliases: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    domain_tags: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    parameters: Vec<ParameterSpec>,
    required_permission: Permission,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

impl ToolDescriptor {
    /// Creates a descriptor for the supplied canonical name.
    ///
    /// The permission defaults to [`Permission::Admin`] so that a descriptor
    /// missing an explicit grant is never accidentally open.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidDescriptor`] if the name is
    /// empty or too long.
    pub fn new(canonical_name: impl Into<String>) -> Result<Self, CatalogError> {
        let canonical_name = canonical_name.into();
        validate_name(&canonical_name)?;
        Ok(Self {
            canonical_name,
            aliases: BTreeSet::new(),
            domain_tags: BTreeSet::new(),
            parameters: Vec::new(),
            required_permission: Permission::Admin,
            description: None,
        })
    }

    /// Adds an alias resolving to this descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidDescriptor`] if the alias is
    /// malformed or equals the canonical name.
    pub fn with_alias(mut self, alias: impl Into<String>) -> Result<Self, CatalogError> {
        let alias = alias.into();
        validate_name(&alias)?;
        if alias == self.canonical_name {
            return Err(CatalogError::InvalidDescriptor {
                reason: format!("alias `{alias}` duplicates the canonical name"),
            });
        }
        self.aliases.insert(alias);
        Ok(self)
    }

    /// Adds a domain tag used for discovery grouping.
    #[must_use]
    pub fn with_domain_tag(mut self, tag: impl Into<String>) -> Self {
        let tag = tag.into();
        if !tag.trim().is_empty() {
            self.domain_tags.insert(tag);
        }
        self
    }

    /// Declares the accepted parameters in order.
    #[must_use]
    pub fn with_parameters(mut self, parameters: Vec<ParameterSpec>) -> Self {
        self.parameters = parameters;
        self
    }

    /// Sets the minimum permission required to invoke the tool.
    #[must_use]
    pub fn with_permission(mut self, permission: Permission) -> Self {
        self.required_permission = permission;
        self
    }

    /// Sets the human-readable description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Returns the canonical name.
    #[must_use]
    pub fn canonical_name(&self) -> &str {
        &self.canonical_name
    }

    /// Returns the alias set.
    #[must_use]
    pub fn aliases(&self) -> &BTreeSet<String> {
        &self.aliases
    }

    /// Returns the domain tags.
    #[must_use]
    pub fn domain_tags(&self) -> &BTreeSet<String> {
        &self.domain_tags
    }

    /// Returns the declared parameter contract.
    #[must_use]
    pub fn parameters(&self) -> &[ParameterSpec] {
        &self.parameters
    }

    /// Returns the minimum permission required for invocation.
    #[must_use]
    pub fn required_permission(&self) -> Permission {
        self.required_permission
    }

    /// Returns the optional description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

fn validate_name(name: &str) -> Result<(), CatalogError> {
    if name.trim().is_empty() {
        return Err(CatalogError::InvalidDescriptor {
            reason: "tool name cannot be empty".into(),
        });
    }
    if name.len() > MAX_TOOL_NAME_LEN {
        return Err(CatalogError::InvalidDescriptor {
            reason: format!("tool name length must be <= {MAX_TOOL_NAME_LEN}"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use medbay_primitives::ParamKind;

    #[test]
    fn descriptor_builder_collects_contract() {
        let descriptor = ToolDescriptor::new("records.search")
            .unwrap()
            .with_alias("search_records")
            .unwrap()
            .with_domain_tag("domain:records")
            .with_parameters(vec![
                ParameterSpec::required("query", ParamKind::String).unwrap(),
                ParameterSpec::infrastructure("storage").unwrap(),
            ])
            .with_permission(Permission::Read)
            .with_description("Search clinical records");

        assert_eq!(descriptor.canonical_name(), "records.search");
        assert!(descriptor.aliases().contains("search_records"));
        assert_eq!(descriptor.required_permission(), Permission::Read);
        assert_eq!(descriptor.parameters().len(), 2);
    }

    #[test]
    fn permission_defaults_closed() {
        let descriptor = ToolDescriptor::new("records.purge").unwrap();
        assert_eq!(descriptor.required_permission(), Permission::Admin);
    }

    #[test]
    fn alias_equal_to_canonical_rejected() {
        let err = ToolDescriptor::new("echo")
            .unwrap()
            .with_alias("echo")
            .expect_err("self alias should fail");
        assert!(matches!(err, CatalogError::InvalidDescriptor { .. }));
    }

    #[test]
    fn empty_name_rejected() {
        let err = ToolDescriptor::new("  ").expect_err("empty name should fail");
        assert!(matches!(err, CatalogError::InvalidDescriptor { .. }));
    }
}
