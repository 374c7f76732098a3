//! Grant scopes over the catalog taxonomy
//!
//! A scope anchors a grant at one node of the five-level tree. Each variant
//! carries exactly the identifiers down to its anchor, so "populated levels
//! form a contiguous prefix" is guaranteed by the type rather than checked at
//! runtime on five optional fields.

use folio_catalog::CatalogNode;
use folio_core::{
    FieldId, FolioError, LeafChain, ManufacturerId, ProductId, Result, SeriesId, YearId,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Scope a grant applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scope {
    /// Covers every product in the catalog
    Global,

    /// Covers every product under one document field
    Field {
        /// The anchor field
        field_id: FieldId,
    },

    /// Covers every product under one production year
    Year {
        /// Ancestor field
        field_id: FieldId,
        /// The anchor year
        year_id: YearId,
    },

    /// Covers every product under one manufacturer
    Manufacturer {
        /// Ancestor field
        field_id: FieldId,
        /// Ancestor year
        year_id: YearId,
        /// The anchor manufacturer
        manufacturer_id: ManufacturerId,
    },

    /// Covers every product under one product series
    Series {
        /// Ancestor field
        field_id: FieldId,
        /// Ancestor year
        year_id: YearId,
        /// Ancestor manufacturer
        manufacturer_id: ManufacturerId,
        /// The anchor series
        series_id: SeriesId,
    },

    /// Covers exactly one product
    Product {
        /// Ancestor field
        field_id: FieldId,
        /// Ancestor year
        year_id: YearId,
        /// Ancestor manufacturer
        manufacturer_id: ManufacturerId,
        /// Ancestor series
        series_id: SeriesId,
        /// The anchor product
        product_id: ProductId,
    },
}

/// Specificity of a scope, totally ordered from least to most specific
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum ScopeLevel {
    /// Least specific
    Global,
    /// Field anchor
    Field,
    /// Year anchor
    Year,
    /// Manufacturer anchor
    Manufacturer,
    /// Series anchor
    Series,
    /// Most specific
    Product,
}

impl fmt::Display for ScopeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScopeLevel::Global => "GLOBAL",
            ScopeLevel::Field => "FIELD",
            ScopeLevel::Year => "YEAR",
            ScopeLevel::Manufacturer => "MANUFACTURER",
            ScopeLevel::Series => "SERIES",
            ScopeLevel::Product => "PRODUCT",
        };
        write!(f, "{name}")
    }
}

impl Scope {
    /// Build a scope from raw, possibly-sparse level identifiers.
    ///
    /// This is the only entry point for untyped five-column input (transport
    /// DTOs, legacy rows). A populated level below an absent one is a
    /// `MalformedScope` error; all-absent input is the global scope.
    pub fn from_parts(
        field_id: Option<FieldId>,
        year_id: Option<YearId>,
        manufacturer_id: Option<ManufacturerId>,
        series_id: Option<SeriesId>,
        product_id: Option<ProductId>,
    ) -> Result<Self> {
        let gap = |present: &str, missing: &str| {
            FolioError::malformed_scope(format!("{present} given without {missing}"))
        };
        match (field_id, year_id, manufacturer_id, series_id, product_id) {
            (None, None, None, None, None) => Ok(Scope::Global),
            (Some(field_id), None, None, None, None) => Ok(Scope::Field { field_id }),
            (Some(field_id), Some(year_id), None, None, None) => {
                Ok(Scope::Year { field_id, year_id })
            }
            (Some(field_id), Some(year_id), Some(manufacturer_id), None, None) => {
                Ok(Scope::Manufacturer {
                    field_id,
                    year_id,
                    manufacturer_id,
                })
            }
            (Some(field_id), Some(year_id), Some(manufacturer_id), Some(series_id), None) => {
                Ok(Scope::Series {
                    field_id,
                    year_id,
                    manufacturer_id,
                    series_id,
                })
            }
            (
                Some(field_id),
                Some(year_id),
                Some(manufacturer_id),
                Some(series_id),
                Some(product_id),
            ) => Ok(Scope::Product {
                field_id,
                year_id,
                manufacturer_id,
                series_id,
                product_id,
            }),
            (None, Some(_), _, _, _) => Err(gap("year", "field")),
            (_, None, Some(_), _, _) => Err(gap("manufacturer", "year")),
            (_, _, None, Some(_), _) => Err(gap("series", "manufacturer")),
            (_, _, _, None, Some(_)) => Err(gap("product", "series")),
        }
    }

    /// Scope anchored at a product, with ancestors taken from its chain
    pub fn product(chain: &LeafChain) -> Self {
        Scope::Product {
            field_id: chain.field_id,
            year_id: chain.year_id,
            manufacturer_id: chain.manufacturer_id,
            series_id: chain.series_id,
            product_id: chain.product_id,
        }
    }

    /// Scope anchored at a product's series
    pub fn series(chain: &LeafChain) -> Self {
        Scope::Series {
            field_id: chain.field_id,
            year_id: chain.year_id,
            manufacturer_id: chain.manufacturer_id,
            series_id: chain.series_id,
        }
    }

    /// Scope anchored at a product's manufacturer
    pub fn manufacturer(chain: &LeafChain) -> Self {
        Scope::Manufacturer {
            field_id: chain.field_id,
            year_id: chain.year_id,
            manufacturer_id: chain.manufacturer_id,
        }
    }

    /// Specificity level of this scope
    pub fn level(&self) -> ScopeLevel {
        match self {
            Scope::Global => ScopeLevel::Global,
            Scope::Field { .. } => ScopeLevel::Field,
            Scope::Year { .. } => ScopeLevel::Year,
            Scope::Manufacturer { .. } => ScopeLevel::Manufacturer,
            Scope::Series { .. } => ScopeLevel::Series,
            Scope::Product { .. } => ScopeLevel::Product,
        }
    }

    /// Whether this scope covers the given leaf.
    ///
    /// Coverage compares the anchor identifier against the matching level of
    /// the leaf chain; the global scope covers everything.
    pub fn covers(&self, leaf: &LeafChain) -> bool {
        match self {
            Scope::Global => true,
            Scope::Field { field_id } => *field_id == leaf.field_id,
            Scope::Year { year_id, .. } => *year_id == leaf.year_id,
            Scope::Manufacturer {
                manufacturer_id, ..
            } => *manufacturer_id == leaf.manufacturer_id,
            Scope::Series { series_id, .. } => *series_id == leaf.series_id,
            Scope::Product { product_id, .. } => *product_id == leaf.product_id,
        }
    }

    /// Every catalog node this scope references, outermost first
    pub fn nodes(&self) -> Vec<CatalogNode> {
        match *self {
            Scope::Global => vec![],
            Scope::Field { field_id } => vec![CatalogNode::Field(field_id)],
            Scope::Year { field_id, year_id } => {
                vec![CatalogNode::Field(field_id), CatalogNode::Year(year_id)]
            }
            Scope::Manufacturer {
                field_id,
                year_id,
                manufacturer_id,
            } => vec![
                CatalogNode::Field(field_id),
                CatalogNode::Year(year_id),
                CatalogNode::Manufacturer(manufacturer_id),
            ],
            Scope::Series {
                field_id,
                year_id,
                manufacturer_id,
                series_id,
            } => vec![
                CatalogNode::Field(field_id),
                CatalogNode::Year(year_id),
                CatalogNode::Manufacturer(manufacturer_id),
                CatalogNode::Series(series_id),
            ],
            Scope::Product {
                field_id,
                year_id,
                manufacturer_id,
                series_id,
                product_id,
            } => vec![
                CatalogNode::Field(field_id),
                CatalogNode::Year(year_id),
                CatalogNode::Manufacturer(manufacturer_id),
                CatalogNode::Series(series_id),
                CatalogNode::Product(product_id),
            ],
        }
    }
}

impl fmt::Display for Scope {
    /// Hierarchy path for admin UI and audit logs
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let nodes = self.nodes();
        if nodes.is_empty() {
            return write!(f, "All documents");
        }
        let mut first = true;
        for node in nodes {
            if !first {
                write!(f, " / ")?;
            }
            write!(f, "{node}")?;
            first = false;
        }
        Ok(())
    }
}
