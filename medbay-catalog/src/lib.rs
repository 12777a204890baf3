//! Tool catalog: descriptor storage, alias resolution, and discovery.
//!
//! Tools are registered once during deterministic process initialization via
//! explicit [`ToolCatalog::register`] calls; there is no implicit collection
//! at import time. Discovery reads vastly outnumber registrations, so the
//! catalog keeps its state behind a reader-writer lock and hands out
//! immutable snapshots.

#![warn(missing_docs, clippy::pedantic)]

mod catalog;
mod descriptor;

/// Catalog storage, snapshots, and resolution.
pub use catalog::{CatalogError, CatalogResult, CatalogSnapshot, ToolCatalog, ToolHandle};
/// Tool contract types and the executor trait.
pub use descriptor::{Tool, ToolContext, ToolDescriptor, ToolError, ToolResult};
