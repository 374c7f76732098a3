//! Administrative grant management
//!
//! Mirrors the admin surface: create, update flags, deactivate, hard delete,
//! and list grants. Every mutating or global-listing operation checks that
//! the acting caller is an administrator; the engine itself never does role
//! checks.

use crate::grant::{Grant, PermissionFlags};
use crate::scope::Scope;
use crate::store::GrantStore;
use crate::validator::GrantValidator;
use async_lock::Mutex;
use async_trait::async_trait;
use folio_core::{Actor, FolioError, GrantId, Result, Role, UserId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// Role lookup for grant subjects
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Role of the given user, or `NotFound`
    async fn role_of(&self, user_id: UserId) -> Result<Role>;
}

/// In-memory implementation of [`UserDirectory`]
#[derive(Default)]
pub struct InMemoryUserDirectory {
    roles: Mutex<HashMap<UserId, Role>>,
}

impl InMemoryUserDirectory {
    /// Create an empty directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user with a role
    pub async fn add_user(&self, user_id: UserId, role: Role) {
        self.roles.lock().await.insert(user_id, role);
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn role_of(&self, user_id: UserId) -> Result<Role> {
        self.roles
            .lock()
            .await
            .get(&user_id)
            .copied()
            .ok_or_else(|| FolioError::not_found(format!("user {user_id}")))
    }
}

/// Request to create a grant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateGrantRequest {
    /// Editor the grant applies to
    pub editor_id: UserId,
    /// Scope anchor
    pub scope: Scope,
    /// Capabilities granted
    pub flags: PermissionFlags,
    /// Free-text note for the admin UI
    pub description: Option<String>,
}

/// Request to update a grant's flags
///
/// Scope is deliberately absent: it is immutable after creation, and a scope
/// change is modeled as deactivate + create.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateGrantRequest {
    /// Replacement capability flags
    pub flags: PermissionFlags,
    /// Replacement description
    pub description: Option<String>,
}

/// Admin-facing grant management service
pub struct GrantService {
    store: Arc<dyn GrantStore>,
    validator: GrantValidator,
    directory: Arc<dyn UserDirectory>,
}

impl GrantService {
    /// Create a service over the given store, validator, and directory
    pub fn new(
        store: Arc<dyn GrantStore>,
        validator: GrantValidator,
        directory: Arc<dyn UserDirectory>,
    ) -> Self {
        Self {
            store,
            validator,
            directory,
        }
    }

    /// Create a new grant for an editor.
    ///
    /// The subject must hold the `Editor` role; administrators are never
    /// represented as grants and plain users are not eligible.
    pub async fn create_grant(&self, acting: &Actor, request: CreateGrantRequest) -> Result<Grant> {
        self.require_admin(acting)?;

        let role = self.directory.role_of(request.editor_id).await?;
        if role != Role::Editor {
            return Err(FolioError::permission_denied(format!(
                "grants can only target editors, {} has role {role:?}",
                request.editor_id
            )));
        }

        let grant = Grant::new(
            request.editor_id,
            request.scope,
            request.flags,
            request.description,
            current_timestamp(),
            acting.id,
        );
        self.validator.validate_new(&grant).await?;
        self.store.insert(grant.clone()).await?;

        info!(editor = %grant.editor_id, grant = %grant.id, "created grant: {}", grant.summary());
        Ok(grant)
    }

    /// Update a grant's flags and description
    pub async fn update_grant(
        &self,
        acting: &Actor,
        grant_id: GrantId,
        request: UpdateGrantRequest,
    ) -> Result<Grant> {
        self.require_admin(acting)?;

        let updated = self
            .store
            .update_flags(grant_id, request.flags, request.description)
            .await?;
        info!(grant = %grant_id, "updated grant: {}", updated.summary());
        Ok(updated)
    }

    /// Deactivate a grant, keeping it for audit
    pub async fn deactivate_grant(&self, acting: &Actor, grant_id: GrantId) -> Result<()> {
        self.require_admin(acting)?;
        self.store.deactivate(grant_id).await?;
        info!(grant = %grant_id, "deactivated grant");
        Ok(())
    }

    /// Irreversibly remove a grant
    pub async fn delete_grant(&self, acting: &Actor, grant_id: GrantId) -> Result<()> {
        self.require_admin(acting)?;
        self.store.hard_delete(grant_id).await?;
        info!(grant = %grant_id, "hard-deleted grant");
        Ok(())
    }

    /// Active grants for one editor.
    ///
    /// Editors may list their own grants; anything else requires admin.
    pub async fn grants_for_editor(&self, acting: &Actor, editor_id: UserId) -> Result<Vec<Grant>> {
        if !acting.is_admin() && acting.id != editor_id {
            return Err(FolioError::permission_denied(
                "only admins may list other editors' grants",
            ));
        }
        self.store.active_grants_for_editor(editor_id).await
    }

    /// Every active grant, for the admin overview
    pub async fn all_grants(&self, acting: &Actor) -> Result<Vec<Grant>> {
        self.require_admin(acting)?;
        self.store.all_active_grants().await
    }

    /// Active-grant counts per editor, for the admin overview
    pub async fn grant_statistics(&self, acting: &Actor) -> Result<HashMap<UserId, usize>> {
        self.require_admin(acting)?;
        self.store.count_by_editor().await
    }

    fn require_admin(&self, acting: &Actor) -> Result<()> {
        if acting.is_admin() {
            Ok(())
        } else {
            Err(FolioError::permission_denied(
                "only admins may manage hierarchical grants",
            ))
        }
    }
}

fn current_timestamp() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
