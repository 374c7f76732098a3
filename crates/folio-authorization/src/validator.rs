//! Structural validation of candidate grants

use crate::grant::Grant;
use crate::store::GrantStore;
use folio_catalog::CatalogTree;
use folio_core::{FolioError, Result};
use std::sync::Arc;
use tracing::debug;

/// Gate in front of grant creation.
///
/// Checks that every node the scope references exists in the catalog, that
/// the recorded ancestors are the anchor's real lineage, and that no other
/// active grant for the same editor has an identical scope. The conflict
/// check here gives the administrator a precise error early; the store's
/// atomic insert is what actually makes the uniqueness invariant hold under
/// concurrency.
pub struct GrantValidator {
    catalog: Arc<dyn CatalogTree>,
    store: Arc<dyn GrantStore>,
}

impl GrantValidator {
    /// Create a validator over the given catalog and store
    pub fn new(catalog: Arc<dyn CatalogTree>, store: Arc<dyn GrantStore>) -> Self {
        Self { catalog, store }
    }

    /// Validate a candidate grant before it is stored.
    ///
    /// Scope contiguity needs no check here: the `Scope` union cannot
    /// represent a gap. Errors are `NodeNotFound` for a dangling scope,
    /// `MalformedScope` for ancestors that are not the anchor's real parent
    /// chain, and `ConflictingGrant` for a duplicate active scope.
    pub async fn validate_new(&self, candidate: &Grant) -> Result<()> {
        let nodes = candidate.scope.nodes();
        for node in &nodes {
            if !self.catalog.node_exists(node).await? {
                debug!(node = %node, "grant scope references missing catalog node");
                return Err(FolioError::node_not_found(node.to_string()));
            }
        }

        // Coverage compares only the anchor id, so a scope whose recorded
        // ancestors belong to a different branch would cover at the same
        // specificity as the true-lineage scope and slip past the identical-
        // scope conflict check. Reject it before it can reach the store.
        for pair in nodes.windows(2) {
            if self.catalog.parent_of(&pair[1]).await? != Some(pair[0]) {
                debug!(node = %pair[1], "grant scope ancestry mismatch");
                return Err(FolioError::malformed_scope(format!(
                    "{} is not under {}",
                    pair[1], pair[0]
                )));
            }
        }

        if let Some(existing) = self
            .store
            .active_grant_with_scope(candidate.editor_id, &candidate.scope)
            .await?
        {
            debug!(existing = %existing.id, "grant scope already covered");
            return Err(FolioError::conflicting_grant(existing.id));
        }

        Ok(())
    }
}
