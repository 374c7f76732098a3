//! Grant persistence interface

use crate::grant::{Grant, PermissionFlags};
use crate::scope::Scope;
use async_lock::Mutex;
use async_trait::async_trait;
use folio_core::{FolioError, GrantId, Result, UserId};
use std::collections::HashMap;

/// Storage interface for permission grants.
///
/// Implementations must make `insert` atomic with respect to the
/// one-active-grant-per-(editor, scope) invariant: two concurrent inserts of
/// the same scope must not both commit. Backends with a transactional
/// uniqueness constraint get this for free; the in-memory store holds its
/// lock across check and insert.
#[async_trait]
pub trait GrantStore: Send + Sync {
    /// Persist a new grant, rejecting a duplicate active (editor, scope) pair
    /// with `ConflictingGrant`.
    async fn insert(&self, grant: Grant) -> Result<()>;

    /// Load a grant by id
    async fn get(&self, grant_id: GrantId) -> Result<Grant>;

    /// Replace a grant's flags and description, returning the updated grant.
    ///
    /// Scope is immutable after creation; changing scope is modeled as
    /// deactivate + create.
    async fn update_flags(
        &self,
        grant_id: GrantId,
        flags: PermissionFlags,
        description: Option<String>,
    ) -> Result<Grant>;

    /// Soft-delete: mark the grant inactive but keep it for audit
    async fn deactivate(&self, grant_id: GrantId) -> Result<()>;

    /// Irreversibly remove a grant
    async fn hard_delete(&self, grant_id: GrantId) -> Result<()>;

    /// All active grants for one editor, oldest first
    async fn active_grants_for_editor(&self, editor_id: UserId) -> Result<Vec<Grant>>;

    /// The active grant with a structurally equal scope, if any
    async fn active_grant_with_scope(
        &self,
        editor_id: UserId,
        scope: &Scope,
    ) -> Result<Option<Grant>>;

    /// Every active grant for the admin overview, ordered by editor and
    /// creation so consecutive calls render the same listing
    async fn all_active_grants(&self) -> Result<Vec<Grant>>;

    /// Active-grant counts per editor
    async fn count_by_editor(&self) -> Result<HashMap<UserId, usize>>;
}

/// In-memory implementation of [`GrantStore`]
#[derive(Default)]
pub struct InMemoryGrantStore {
    grants: Mutex<HashMap<GrantId, Grant>>,
}

impl InMemoryGrantStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GrantStore for InMemoryGrantStore {
    async fn insert(&self, grant: Grant) -> Result<()> {
        // Conflict check and insert under one guard; this is the
        // transactional uniqueness the resolution invariants depend on.
        let mut grants = self.grants.lock().await;
        if let Some(existing) = grants
            .values()
            .find(|g| g.active && g.editor_id == grant.editor_id && g.scope == grant.scope)
        {
            return Err(FolioError::conflicting_grant(existing.id));
        }
        grants.insert(grant.id, grant);
        Ok(())
    }

    async fn get(&self, grant_id: GrantId) -> Result<Grant> {
        let grants = self.grants.lock().await;
        grants
            .get(&grant_id)
            .cloned()
            .ok_or_else(|| FolioError::not_found(format!("grant {grant_id}")))
    }

    async fn update_flags(
        &self,
        grant_id: GrantId,
        flags: PermissionFlags,
        description: Option<String>,
    ) -> Result<Grant> {
        let mut grants = self.grants.lock().await;
        let grant = grants
            .get_mut(&grant_id)
            .ok_or_else(|| FolioError::not_found(format!("grant {grant_id}")))?;
        grant.flags = flags;
        grant.description = description;
        Ok(grant.clone())
    }

    async fn deactivate(&self, grant_id: GrantId) -> Result<()> {
        let mut grants = self.grants.lock().await;
        let grant = grants
            .get_mut(&grant_id)
            .ok_or_else(|| FolioError::not_found(format!("grant {grant_id}")))?;
        grant.active = false;
        Ok(())
    }

    async fn hard_delete(&self, grant_id: GrantId) -> Result<()> {
        let mut grants = self.grants.lock().await;
        grants
            .remove(&grant_id)
            .map(|_| ())
            .ok_or_else(|| FolioError::not_found(format!("grant {grant_id}")))
    }

    async fn active_grants_for_editor(&self, editor_id: UserId) -> Result<Vec<Grant>> {
        let grants = self.grants.lock().await;
        let mut active: Vec<Grant> = grants
            .values()
            .filter(|g| g.active && g.editor_id == editor_id)
            .cloned()
            .collect();
        active.sort_by_key(|g| (g.created_at, g.id));
        Ok(active)
    }

    async fn active_grant_with_scope(
        &self,
        editor_id: UserId,
        scope: &Scope,
    ) -> Result<Option<Grant>> {
        let grants = self.grants.lock().await;
        Ok(grants
            .values()
            .find(|g| g.active && g.editor_id == editor_id && g.scope == *scope)
            .cloned())
    }

    async fn all_active_grants(&self) -> Result<Vec<Grant>> {
        let grants = self.grants.lock().await;
        let mut active: Vec<Grant> = grants.values().filter(|g| g.active).cloned().collect();
        active.sort_by_key(|g| (g.editor_id, g.created_at, g.id));
        Ok(active)
    }

    async fn count_by_editor(&self) -> Result<HashMap<UserId, usize>> {
        let grants = self.grants.lock().await;
        let mut counts = HashMap::new();
        for grant in grants.values().filter(|g| g.active) {
            *counts.entry(grant.editor_id).or_insert(0) += 1;
        }
        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::{FieldId, LeafChain, ManufacturerId, ProductId, SeriesId, YearId};

    fn chain() -> LeafChain {
        LeafChain::new(
            FieldId::new(),
            YearId::new(),
            ManufacturerId::new(),
            SeriesId::new(),
            ProductId::new(),
        )
    }

    fn grant_for(editor: UserId, scope: Scope) -> Grant {
        Grant::new(
            editor,
            scope,
            PermissionFlags::default(),
            None,
            0,
            UserId::new(),
        )
    }

    #[tokio::test]
    async fn insert_rejects_duplicate_active_scope() {
        let store = InMemoryGrantStore::new();
        let editor = UserId::new();
        let scope = Scope::series(&chain());

        let first = grant_for(editor, scope);
        let first_id = first.id;
        store.insert(first).await.unwrap();

        let err = store.insert(grant_for(editor, scope)).await.unwrap_err();
        assert_eq!(err, FolioError::conflicting_grant(first_id));
    }

    #[tokio::test]
    async fn deactivation_frees_the_scope_for_a_new_grant() {
        let store = InMemoryGrantStore::new();
        let editor = UserId::new();
        let scope = Scope::series(&chain());

        let first = grant_for(editor, scope);
        let first_id = first.id;
        store.insert(first).await.unwrap();
        store.deactivate(first_id).await.unwrap();

        store.insert(grant_for(editor, scope)).await.unwrap();
        assert_eq!(
            store.active_grants_for_editor(editor).await.unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn same_scope_for_different_editors_is_not_a_conflict() {
        let store = InMemoryGrantStore::new();
        let scope = Scope::series(&chain());

        store.insert(grant_for(UserId::new(), scope)).await.unwrap();
        store.insert(grant_for(UserId::new(), scope)).await.unwrap();
    }

    #[tokio::test]
    async fn update_flags_keeps_scope() {
        let store = InMemoryGrantStore::new();
        let editor = UserId::new();
        let scope = Scope::manufacturer(&chain());
        let grant = grant_for(editor, scope);
        let id = grant.id;
        store.insert(grant).await.unwrap();

        let updated = store
            .update_flags(id, PermissionFlags::all(), Some("full rights".into()))
            .await
            .unwrap();
        assert_eq!(updated.scope, scope);
        assert!(updated.flags.can_delete);
    }

    #[tokio::test]
    async fn hard_delete_removes_the_grant() {
        let store = InMemoryGrantStore::new();
        let grant = grant_for(UserId::new(), Scope::Global);
        let id = grant.id;
        store.insert(grant).await.unwrap();

        store.hard_delete(id).await.unwrap();
        let err = store.get(id).await.unwrap_err();
        assert!(matches!(err, FolioError::NotFound { .. }));
    }

    #[tokio::test]
    async fn all_active_grants_come_back_in_editor_order() {
        let store = InMemoryGrantStore::new();
        let mut editors = vec![UserId::new(), UserId::new(), UserId::new()];
        for &editor in &editors {
            store.insert(grant_for(editor, Scope::Global)).await.unwrap();
        }

        editors.sort();
        let listed: Vec<UserId> = store
            .all_active_grants()
            .await
            .unwrap()
            .iter()
            .map(|g| g.editor_id)
            .collect();
        assert_eq!(listed, editors);
    }

    #[tokio::test]
    async fn editor_grants_come_back_oldest_first() {
        let store = InMemoryGrantStore::new();
        let editor = UserId::new();
        let c = chain();

        let mut late = grant_for(editor, Scope::series(&c));
        late.created_at = 20;
        let mut early = grant_for(editor, Scope::manufacturer(&c));
        early.created_at = 10;
        store.insert(late.clone()).await.unwrap();
        store.insert(early.clone()).await.unwrap();

        let listed = store.active_grants_for_editor(editor).await.unwrap();
        assert_eq!(listed, vec![early, late]);
    }

    #[tokio::test]
    async fn count_by_editor_only_counts_active() {
        let store = InMemoryGrantStore::new();
        let editor = UserId::new();
        let c = chain();

        let g1 = grant_for(editor, Scope::series(&c));
        let g2 = grant_for(editor, Scope::manufacturer(&c));
        let g2_id = g2.id;
        store.insert(g1).await.unwrap();
        store.insert(g2).await.unwrap();
        store.deactivate(g2_id).await.unwrap();

        let counts = store.count_by_editor().await.unwrap();
        assert_eq!(counts.get(&editor), Some(&1));
    }
}
