//! Leaf chains: fully-resolved positions in the catalog taxonomy
//!
//! A `LeafChain` is the ancestor chain of one product: field, year,
//! manufacturer, series, product. It is fully populated by construction, so
//! resolution never has to re-check for gaps.

use crate::identifiers::{FieldId, ManufacturerId, ProductId, SeriesId, YearId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fully-populated ancestor chain for a product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LeafChain {
    /// Taxonomy level 1
    pub field_id: FieldId,
    /// Taxonomy level 2
    pub year_id: YearId,
    /// Taxonomy level 3
    pub manufacturer_id: ManufacturerId,
    /// Taxonomy level 4
    pub series_id: SeriesId,
    /// Taxonomy level 5, the leaf
    pub product_id: ProductId,
}

impl LeafChain {
    /// Create a leaf chain from its five levels
    pub fn new(
        field_id: FieldId,
        year_id: YearId,
        manufacturer_id: ManufacturerId,
        series_id: SeriesId,
        product_id: ProductId,
    ) -> Self {
        Self {
            field_id,
            year_id,
            manufacturer_id,
            series_id,
            product_id,
        }
    }

    /// Build a leaf chain from raw, possibly-incomplete input.
    ///
    /// Storage layers and transport DTOs hand over five optional ids; an
    /// absent level at any position is an `InvalidChain` error, since a
    /// partial chain can never identify a product.
    pub fn from_parts(
        field_id: Option<FieldId>,
        year_id: Option<YearId>,
        manufacturer_id: Option<ManufacturerId>,
        series_id: Option<SeriesId>,
        product_id: Option<ProductId>,
    ) -> crate::Result<Self> {
        let missing = |level: &str| crate::FolioError::invalid_chain(format!("missing {level}"));
        Ok(Self {
            field_id: field_id.ok_or_else(|| missing("field"))?,
            year_id: year_id.ok_or_else(|| missing("year"))?,
            manufacturer_id: manufacturer_id.ok_or_else(|| missing("manufacturer"))?,
            series_id: series_id.ok_or_else(|| missing("series"))?,
            product_id: product_id.ok_or_else(|| missing("product"))?,
        })
    }
}

impl fmt::Display for LeafChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} / {} / {} / {} / {}",
            self.field_id, self.year_id, self.manufacturer_id, self.series_id, self.product_id
        )
    }
}
