//! Resolution engine: most-specific covering grant wins
//!
//! Resolution is a pure function of (editor, leaf chain, current grant set):
//! fetch the editor's active grants, keep the ones whose scope covers the
//! leaf, and take the one with the highest specificity. No covering grant
//! means default-deny. Two covering grants at the same level cannot happen
//! when the store's uniqueness invariant holds, so the engine surfaces that
//! case as an internal error instead of silently picking one.

use crate::grant::{EffectivePermission, Grant};
use crate::store::GrantStore;
use folio_core::{FolioError, LeafChain, Result, UserId};
use std::sync::Arc;
use tracing::debug;

/// Select the winning grant among an editor's active grants.
///
/// Pure selection logic, independent of any store; `ResolutionEngine` feeds
/// it the fetched grant set.
pub fn resolve_among(grants: &[Grant], leaf: &LeafChain) -> Result<EffectivePermission> {
    let mut winner: Option<&Grant> = None;
    let mut contested = false;

    for grant in grants.iter().filter(|g| g.active && g.scope.covers(leaf)) {
        match winner {
            None => {
                winner = Some(grant);
                contested = false;
            }
            Some(current) => {
                if grant.scope.level() > current.scope.level() {
                    winner = Some(grant);
                    contested = false;
                } else if grant.scope.level() == current.scope.level() {
                    contested = true;
                }
            }
        }
    }

    match winner {
        Some(grant) if contested => Err(FolioError::internal(format!(
            "multiple covering grants at level {} for editor {}",
            grant.scope.level(),
            grant.editor_id
        ))),
        Some(grant) => Ok(EffectivePermission::from_grant(grant)),
        None => Ok(EffectivePermission::deny()),
    }
}

/// Stateless resolution component over a grant store
pub struct ResolutionEngine {
    store: Arc<dyn GrantStore>,
}

impl ResolutionEngine {
    /// Create an engine over the given store
    pub fn new(store: Arc<dyn GrantStore>) -> Self {
        Self { store }
    }

    /// Derive the effective permission for an editor at a leaf
    pub async fn resolve(
        &self,
        editor_id: UserId,
        leaf: &LeafChain,
    ) -> Result<EffectivePermission> {
        let grants = self.store.active_grants_for_editor(editor_id).await?;
        let effective = resolve_among(&grants, leaf)?;
        debug!(
            editor = %editor_id,
            product = %leaf.product_id,
            matched = ?effective.matched_scope.map(|s| s.level()),
            "resolved effective permission"
        );
        Ok(effective)
    }
}
