//! Runtime catalog storing registered tools and resolving names.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use thiserror::Error;
use tracing::{debug, info};

use crate::descriptor::{Tool, ToolDescriptor};

/// Result alias for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors produced by registration and resolution.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Descriptor failed validation before registration.
    #[error("invalid tool descriptor: {reason}")]
    InvalidDescriptor {
        /// Human-readable reason for rejection.
        reason: String,
    },

    /// Canonical name or alias collided with an existing registration.
    #[error("tool name `{name}` is already registered")]
    DuplicateName {
        /// The colliding name.
        name: String,
    },

    /// Requested name matched neither a canonical name nor an alias.
    #[error("tool `{name}` is not registered")]
    UnknownTool {
        /// The unresolved name.
        name: String,
    },
}

/// Handle to one registered tool, cloned out of the catalog for invocation.
#[derive(Clone)]
pub struct ToolHandle {
    descriptor: Arc<ToolDescriptor>,
    executor: Arc<dyn Tool>,
}

impl ToolHandle {
    /// Returns the descriptor backing this handle.
    #[must_use]
    pub fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    /// Returns the executor for pipeline invocation.
    #[must_use]
    pub fn executor(&self) -> Arc<dyn Tool> {
        Arc::clone(&self.executor)
    }
}

impl std::fmt::Debug for ToolHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolHandle")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

/// Read-only view of the catalog taken at one instant.
///
/// A snapshot never observes a partially applied registration: it is built
/// under the same lock that serializes mutations.
#[derive(Clone)]
pub struct CatalogSnapshot {
    descriptors: Arc<Vec<Arc<ToolDescriptor>>>,
    version: u64,
}

impl CatalogSnapshot {
    /// Returns all descriptors in registration order.
    #[must_use]
    pub fn list_all(&self) -> Vec<Arc<ToolDescriptor>> {
        self.descriptors.as_ref().clone()
    }

    /// Returns descriptors carrying the supplied domain tag, in registration
    /// order.
    #[must_use]
    pub fn list_by_domain(&self, tag: &str) -> Vec<Arc<ToolDescriptor>> {
        self.descriptors
            .iter()
            .filter(|descriptor| descriptor.domain_tags().contains(tag))
            .cloned()
            .collect()
    }

    /// Returns the descriptor for the supplied canonical name or alias.
    #[must_use]
    pub fn describe(&self, name: &str) -> Option<Arc<ToolDescriptor>> {
        self.descriptors
            .iter()
            .find(|descriptor| {
                descriptor.canonical_name() == name || descriptor.aliases().contains(name)
            })
            .cloned()
    }

    /// Returns the store version the snapshot was taken at.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }
}

struct CatalogState {
    // Canonical name -> handle; `order` preserves registration order for
    // deterministic discovery listings.
    tools: HashMap<String, ToolHandle>,
    aliases: HashMap<String, String>,
    order: Vec<String>,
    version: u64,
}

impl CatalogState {
    fn assert_names_free(&self, descriptor: &ToolDescriptor, replacing: Option<&str>) -> CatalogResult<()> {
        let canonical = descriptor.canonical_name();
        let taken = |name: &str| {
            let holder = if self.tools.contains_key(name) {
                Some(name)
            } else {
                self.aliases.get(name).map(String::as_str)
            };
            match holder {
                Some(owner) => replacing != Some(owner),
                None => false,
            }
        };
        if taken(canonical) {
            return Err(CatalogError::DuplicateName {
                name: canonical.to_owned(),
            });
        }
        for alias in descriptor.aliases() {
            if taken(alias) {
                return Err(CatalogError::DuplicateName {
                    name: alias.clone(),
                });
            }
        }
        Ok(())
    }

    fn insert(&mut self, descriptor: Arc<ToolDescriptor>, executor: Arc<dyn Tool>) {
        let canonical = descriptor.canonical_name().to_owned();
        for alias in descriptor.aliases() {
            self.aliases.insert(alias.clone(), canonical.clone());
        }
        self.order.push(canonical.clone());
        self.tools.insert(
            canonical,
            ToolHandle {
                descriptor,
                executor,
            },
        );
        self.version += 1;
    }

    fn remove(&mut self, canonical: &str) -> Option<ToolHandle> {
        let handle = self.tools.remove(canonical)?;
        self.aliases
            .retain(|_, target| target.as_str() != canonical);
        self.order.retain(|name| name.as_str() != canonical);
        self.version += 1;
        Some(handle)
    }
}

/// Registry that stores tool descriptors and their implementations.
///
/// Mutations are linearizable under the write lock; reads go through cheap
/// cloned handles or [`CatalogSnapshot`]s.
pub struct ToolCatalog {
    state: RwLock<CatalogState>,
}

impl Default for ToolCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ToolCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read().expect("catalog poisoned");
        f.debug_struct("ToolCatalog")
            .field("registered", &state.order)
            .field("version", &state.version)
            .finish()
    }
}

impl ToolCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: RwLock::new(CatalogState {
                tools: HashMap::new(),
                aliases: HashMap::new(),
                order: Vec::new(),
                version: 0,
            }),
        }
    }

    /// Registers a tool, rejecting any name collision.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateName`] if the canonical name or any
    /// alias is already taken, by either a canonical entry or an alias.
    ///
    /// # Panics
    ///
    /// Panics if the internal catalog lock is poisoned.
    pub fn register<T>(&self, descriptor: ToolDescriptor, tool: T) -> CatalogResult<()>
    where
        T: Tool + 'static,
    {
        let mut state = self.state.write().expect("catalog poisoned");
        state.assert_names_free(&descriptor, None)?;
        info!(tool = descriptor.canonical_name(), "tool registered");
        state.insert(Arc::new(descriptor), Arc::new(tool));
        Ok(())
    }

    /// Registers a tool, atomically replacing any prior registration under
    /// the same canonical name.
    ///
    /// The prior entry's aliases are released as part of the same swap, so a
    /// reader either sees the old descriptor in full or the new one in full.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateName`] if one of the new names is
    /// held by a different tool.
    ///
    /// # Panics
    ///
    /// Panics if the internal catalog lock is poisoned.
    pub fn register_replacing<T>(&self, descriptor: ToolDescriptor, tool: T) -> CatalogResult<()>
    where
        T: Tool + 'static,
    {
        let mut state = self.state.write().expect("catalog poisoned");
        let canonical = descriptor.canonical_name().to_owned();
        state.assert_names_free(&descriptor, Some(&canonical))?;
        let replaced = state.remove(&canonical).is_some();
        info!(tool = %canonical, replaced, "tool registered");
        state.insert(Arc::new(descriptor), Arc::new(tool));
        Ok(())
    }

    /// Removes a tool and all of its aliases.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownTool`] if the name resolves to nothing.
    ///
    /// # Panics
    ///
    /// Panics if the internal catalog lock is poisoned.
    pub fn unregister(&self, name: &str) -> CatalogResult<()> {
        let mut state = self.state.write().expect("catalog poisoned");
        let canonical = if state.tools.contains_key(name) {
            name.to_owned()
        } else {
            state
                .aliases
                .get(name)
                .cloned()
                .ok_or_else(|| CatalogError::UnknownTool {
                    name: name.to_owned(),
                })?
        };
        state.remove(&canonical);
        info!(tool = %canonical, "tool unregistered");
        Ok(())
    }

    /// Resolves a raw name to a handle, looking through aliases.
    ///
    /// Resolution is exact and case-sensitive: canonical match wins first,
    /// then the alias table. There is no fuzzy matching.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownTool`] when nothing matches.
    ///
    /// # Panics
    ///
    /// Panics if the internal catalog lock is poisoned.
    pub fn resolve(&self, name: &str) -> CatalogResult<ToolHandle> {
        let state = self.state.read().expect("catalog poisoned");
        if let Some(handle) = state.tools.get(name) {
            return Ok(handle.clone());
        }
        if let Some(canonical) = state.aliases.get(name) {
            debug!(alias = name, canonical = %canonical, "alias resolved");
            if let Some(handle) = state.tools.get(canonical) {
                return Ok(handle.clone());
            }
        }
        Err(CatalogError::UnknownTool {
            name: name.to_owned(),
        })
    }

    /// Returns a handle for the supplied name, if registered.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<ToolHandle> {
        self.resolve(name).ok()
    }

    /// Takes a consistent read-only snapshot for discovery.
    ///
    /// # Panics
    ///
    /// Panics if the internal catalog lock is poisoned.
    #[must_use]
    pub fn snapshot(&self) -> CatalogSnapshot {
        let state = self.state.read().expect("catalog poisoned");
        let descriptors = state
            .order
            .iter()
            .filter_map(|name| state.tools.get(name))
            .map(|handle| Arc::clone(&handle.descriptor))
            .collect();
        CatalogSnapshot {
            descriptors: Arc::new(descriptors),
            version: state.version,
        }
    }

    /// Returns the monotone store version, bumped on every mutation.
    ///
    /// # Panics
    ///
    /// Panics if the internal catalog lock is poisoned.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.state.read().expect("catalog poisoned").version
    }
}
