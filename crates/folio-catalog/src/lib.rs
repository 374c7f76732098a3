//! Catalog tree provider
//!
//! Read-only lookup over the five-level document taxonomy
//! (field / year / manufacturer / series / product). The authorization engine
//! consumes this boundary to resolve a product into its full ancestor chain
//! and to validate that grant scopes reference real nodes.

pub mod memory;
pub mod provider;

pub use memory::InMemoryCatalog;
pub use provider::{CatalogNode, CatalogTree};
