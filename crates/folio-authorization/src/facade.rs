//! Authorization facade
//!
//! The only entry point other subsystems call. Role short-circuits live
//! here: administrators bypass the grant system entirely and non-editors are
//! always denied, so callers must never reach the resolution engine
//! directly.

use crate::engine::ResolutionEngine;
use crate::grant::{Capability, EffectivePermission, PermissionFlags};
use crate::store::GrantStore;
use folio_catalog::CatalogTree;
use folio_core::{Actor, LeafChain, ProductId, Result, Role};
use std::sync::Arc;
use tracing::trace;

/// Facade over role rules and scoped-grant resolution
pub struct Authorizer {
    engine: ResolutionEngine,
    catalog: Arc<dyn CatalogTree>,
}

impl Authorizer {
    /// Create an authorizer over the given store and catalog
    pub fn new(store: Arc<dyn GrantStore>, catalog: Arc<dyn CatalogTree>) -> Self {
        Self {
            engine: ResolutionEngine::new(store),
            catalog,
        }
    }

    /// Whether the actor may upload documents into the leaf's product
    pub async fn can_upload(&self, actor: &Actor, leaf: &LeafChain) -> Result<bool> {
        self.check(actor, leaf, Capability::Upload).await
    }

    /// Whether the actor may edit document metadata under the leaf's product
    pub async fn can_edit(&self, actor: &Actor, leaf: &LeafChain) -> Result<bool> {
        self.check(actor, leaf, Capability::Edit).await
    }

    /// Whether the actor may delete documents under the leaf's product
    pub async fn can_delete(&self, actor: &Actor, leaf: &LeafChain) -> Result<bool> {
        self.check(actor, leaf, Capability::Delete).await
    }

    /// Whether the actor may view the leaf's product and its documents
    pub async fn can_view(&self, actor: &Actor, leaf: &LeafChain) -> Result<bool> {
        self.check(actor, leaf, Capability::View).await
    }

    /// Full effective capability set for an actor at a leaf.
    ///
    /// Administrators get all flags with no matched scope; non-editors get
    /// default-deny without touching the store.
    pub async fn effective_permission(
        &self,
        actor: &Actor,
        leaf: &LeafChain,
    ) -> Result<EffectivePermission> {
        match actor.role {
            Role::Admin => Ok(EffectivePermission {
                flags: PermissionFlags::all(),
                matched_scope: None,
            }),
            Role::Editor => self.engine.resolve(actor.id, leaf).await,
            Role::User => Ok(EffectivePermission::deny()),
        }
    }

    /// Resolve a product into its leaf chain via the catalog
    pub async fn leaf_for_product(&self, product_id: ProductId) -> Result<LeafChain> {
        self.catalog.ancestor_chain(product_id).await
    }

    /// Products the actor may upload into
    pub async fn uploadable_products(&self, actor: &Actor) -> Result<Vec<ProductId>> {
        self.products_with(actor, Capability::Upload).await
    }

    /// Products visible to the actor
    pub async fn visible_products(&self, actor: &Actor) -> Result<Vec<ProductId>> {
        self.products_with(actor, Capability::View).await
    }

    async fn check(&self, actor: &Actor, leaf: &LeafChain, capability: Capability) -> Result<bool> {
        if actor.is_admin() {
            return Ok(true);
        }
        if !actor.is_editor() {
            trace!(actor = %actor.id, "denied: not an editor");
            return Ok(false);
        }
        let effective = self.engine.resolve(actor.id, leaf).await?;
        Ok(effective.allows(capability))
    }

    async fn products_with(&self, actor: &Actor, capability: Capability) -> Result<Vec<ProductId>> {
        // Stable order regardless of how the catalog iterates.
        let mut all = self.catalog.all_products().await?;
        all.sort();
        if actor.is_admin() {
            return Ok(all);
        }
        if !actor.is_editor() {
            return Ok(Vec::new());
        }
        let mut allowed = Vec::new();
        for product_id in all {
            let leaf = self.catalog.ancestor_chain(product_id).await?;
            if self.check(actor, &leaf, capability).await? {
                allowed.push(product_id);
            }
        }
        Ok(allowed)
    }
}
