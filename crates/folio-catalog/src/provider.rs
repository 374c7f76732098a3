//! Catalog tree lookup interface

use async_trait::async_trait;
use folio_core::{FieldId, LeafChain, ManufacturerId, ProductId, Result, SeriesId, YearId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reference to one node at any level of the taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CatalogNode {
    /// A document field (level 1)
    Field(FieldId),
    /// A production year (level 2)
    Year(YearId),
    /// A manufacturer (level 3)
    Manufacturer(ManufacturerId),
    /// A product series (level 4)
    Series(SeriesId),
    /// A product (level 5)
    Product(ProductId),
}

impl fmt::Display for CatalogNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogNode::Field(id) => write!(f, "{id}"),
            CatalogNode::Year(id) => write!(f, "{id}"),
            CatalogNode::Manufacturer(id) => write!(f, "{id}"),
            CatalogNode::Series(id) => write!(f, "{id}"),
            CatalogNode::Product(id) => write!(f, "{id}"),
        }
    }
}

/// Read-only lookup over the catalog taxonomy.
///
/// Owned by the catalog subsystem; the authorization engine only consumes it.
/// Implementations back this with whatever the catalog persists to; the
/// in-memory implementation in this crate serves tests and small deployments.
#[async_trait]
pub trait CatalogTree: Send + Sync {
    /// Resolve a product into its full ancestor chain.
    ///
    /// Returns `NotFound` when the product does not exist.
    async fn ancestor_chain(&self, product_id: ProductId) -> Result<LeafChain>;

    /// Whether a node exists at its level of the taxonomy.
    async fn node_exists(&self, node: &CatalogNode) -> Result<bool>;

    /// Parent of a node, one level up.
    ///
    /// Returns `None` for a field (the top level) and `NotFound` when the
    /// node itself does not exist. Grant validation uses this to check that
    /// a scope's recorded ancestors are the anchor's real lineage.
    async fn parent_of(&self, node: &CatalogNode) -> Result<Option<CatalogNode>>;

    /// Enumerate every product in the catalog.
    ///
    /// Used by the facade to list the products an actor may upload to or
    /// view.
    async fn all_products(&self) -> Result<Vec<ProductId>>;
}
