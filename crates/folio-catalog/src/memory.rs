//! In-memory catalog tree
//!
//! Parent-linked maps for each taxonomy level. Registration rejects dangling
//! parents, so every stored product can always be resolved into a complete
//! ancestor chain.

use crate::provider::{CatalogNode, CatalogTree};
use async_lock::Mutex;
use async_trait::async_trait;
use folio_core::{
    FieldId, FolioError, LeafChain, ManufacturerId, ProductId, Result, SeriesId, YearId,
};
use std::collections::{HashMap, HashSet};

#[derive(Default)]
struct CatalogState {
    fields: HashSet<FieldId>,
    years: HashMap<YearId, FieldId>,
    manufacturers: HashMap<ManufacturerId, YearId>,
    series: HashMap<SeriesId, ManufacturerId>,
    products: HashMap<ProductId, SeriesId>,
}

/// In-memory implementation of [`CatalogTree`]
#[derive(Default)]
pub struct InMemoryCatalog {
    state: Mutex<CatalogState>,
}

impl InMemoryCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a document field
    pub async fn add_field(&self, field_id: FieldId) {
        self.state.lock().await.fields.insert(field_id);
    }

    /// Register a production year under a field
    pub async fn add_year(&self, year_id: YearId, field_id: FieldId) -> Result<()> {
        let mut state = self.state.lock().await;
        if !state.fields.contains(&field_id) {
            return Err(FolioError::not_found(format!("field {field_id}")));
        }
        state.years.insert(year_id, field_id);
        Ok(())
    }

    /// Register a manufacturer under a year
    pub async fn add_manufacturer(
        &self,
        manufacturer_id: ManufacturerId,
        year_id: YearId,
    ) -> Result<()> {
        let mut state = self.state.lock().await;
        if !state.years.contains_key(&year_id) {
            return Err(FolioError::not_found(format!("year {year_id}")));
        }
        state.manufacturers.insert(manufacturer_id, year_id);
        Ok(())
    }

    /// Register a product series under a manufacturer
    pub async fn add_series(
        &self,
        series_id: SeriesId,
        manufacturer_id: ManufacturerId,
    ) -> Result<()> {
        let mut state = self.state.lock().await;
        if !state.manufacturers.contains_key(&manufacturer_id) {
            return Err(FolioError::not_found(format!(
                "manufacturer {manufacturer_id}"
            )));
        }
        state.series.insert(series_id, manufacturer_id);
        Ok(())
    }

    /// Register a product under a series
    pub async fn add_product(&self, product_id: ProductId, series_id: SeriesId) -> Result<()> {
        let mut state = self.state.lock().await;
        if !state.series.contains_key(&series_id) {
            return Err(FolioError::not_found(format!("series {series_id}")));
        }
        state.products.insert(product_id, series_id);
        Ok(())
    }
}

#[async_trait]
impl CatalogTree for InMemoryCatalog {
    async fn ancestor_chain(&self, product_id: ProductId) -> Result<LeafChain> {
        let state = self.state.lock().await;
        let series_id = *state
            .products
            .get(&product_id)
            .ok_or_else(|| FolioError::not_found(format!("product {product_id}")))?;
        // Parent links are checked at registration; a broken walk here means
        // the catalog state itself is corrupted.
        let manufacturer_id = *state
            .series
            .get(&series_id)
            .ok_or_else(|| FolioError::internal(format!("series {series_id} lost its parent")))?;
        let year_id = *state.manufacturers.get(&manufacturer_id).ok_or_else(|| {
            FolioError::internal(format!("manufacturer {manufacturer_id} lost its parent"))
        })?;
        let field_id = *state
            .years
            .get(&year_id)
            .ok_or_else(|| FolioError::internal(format!("year {year_id} lost its parent")))?;
        Ok(LeafChain::new(
            field_id,
            year_id,
            manufacturer_id,
            series_id,
            product_id,
        ))
    }

    async fn node_exists(&self, node: &CatalogNode) -> Result<bool> {
        let state = self.state.lock().await;
        Ok(match node {
            CatalogNode::Field(id) => state.fields.contains(id),
            CatalogNode::Year(id) => state.years.contains_key(id),
            CatalogNode::Manufacturer(id) => state.manufacturers.contains_key(id),
            CatalogNode::Series(id) => state.series.contains_key(id),
            CatalogNode::Product(id) => state.products.contains_key(id),
        })
    }

    async fn parent_of(&self, node: &CatalogNode) -> Result<Option<CatalogNode>> {
        let state = self.state.lock().await;
        match node {
            CatalogNode::Field(id) => {
                if state.fields.contains(id) {
                    Ok(None)
                } else {
                    Err(FolioError::not_found(format!("field {id}")))
                }
            }
            CatalogNode::Year(id) => state
                .years
                .get(id)
                .map(|field_id| Some(CatalogNode::Field(*field_id)))
                .ok_or_else(|| FolioError::not_found(format!("year {id}"))),
            CatalogNode::Manufacturer(id) => state
                .manufacturers
                .get(id)
                .map(|year_id| Some(CatalogNode::Year(*year_id)))
                .ok_or_else(|| FolioError::not_found(format!("manufacturer {id}"))),
            CatalogNode::Series(id) => state
                .series
                .get(id)
                .map(|manufacturer_id| Some(CatalogNode::Manufacturer(*manufacturer_id)))
                .ok_or_else(|| FolioError::not_found(format!("series {id}"))),
            CatalogNode::Product(id) => state
                .products
                .get(id)
                .map(|series_id| Some(CatalogNode::Series(*series_id)))
                .ok_or_else(|| FolioError::not_found(format!("product {id}"))),
        }
    }

    async fn all_products(&self) -> Result<Vec<ProductId>> {
        let state = self.state.lock().await;
        Ok(state.products.keys().copied().collect())
    }
}
