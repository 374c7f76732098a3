//! Permission grants and their derived capability sets

use crate::scope::Scope;
use folio_core::{GrantId, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the four scoped capabilities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    /// Accept a document file into a product
    Upload,
    /// Change document metadata
    Edit,
    /// Remove a document or file
    Delete,
    /// See the catalog node and its documents
    View,
}

/// Capability flags carried by a grant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionFlags {
    /// Upload documents
    pub can_upload: bool,
    /// Edit document metadata
    pub can_edit: bool,
    /// Delete documents
    pub can_delete: bool,
    /// View documents
    pub can_view: bool,
}

impl PermissionFlags {
    /// All four capabilities denied
    pub fn none() -> Self {
        Self {
            can_upload: false,
            can_edit: false,
            can_delete: false,
            can_view: false,
        }
    }

    /// All four capabilities allowed
    pub fn all() -> Self {
        Self {
            can_upload: true,
            can_edit: true,
            can_delete: true,
            can_view: true,
        }
    }

    /// Project one capability out of the flag set
    pub fn allows(&self, capability: Capability) -> bool {
        match capability {
            Capability::Upload => self.can_upload,
            Capability::Edit => self.can_edit,
            Capability::Delete => self.can_delete,
            Capability::View => self.can_view,
        }
    }
}

impl Default for PermissionFlags {
    /// Upload, edit, and view are on by default; delete always needs an
    /// explicit opt-in.
    fn default() -> Self {
        Self {
            can_upload: true,
            can_edit: true,
            can_delete: false,
            can_view: true,
        }
    }
}

impl fmt::Display for PermissionFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::with_capacity(4);
        if self.can_upload {
            parts.push("UPLOAD");
        }
        if self.can_edit {
            parts.push("EDIT");
        }
        if self.can_delete {
            parts.push("DELETE");
        }
        if self.can_view {
            parts.push("VIEW");
        }
        if parts.is_empty() {
            write!(f, "NONE")
        } else {
            write!(f, "{}", parts.join(" "))
        }
    }
}

/// A stored permission grant
///
/// Created by administrators, anchored at one scope, and soft-deactivated
/// rather than removed so the audit trail survives. At most one active grant
/// may exist per (editor, scope) pair; the store enforces this atomically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grant {
    /// Unique identifier
    pub id: GrantId,
    /// The editor this grant applies to
    pub editor_id: UserId,
    /// Where in the taxonomy the grant is anchored
    pub scope: Scope,
    /// Capabilities granted within the scope
    pub flags: PermissionFlags,
    /// Free-text note for the admin UI
    pub description: Option<String>,
    /// Deactivated grants are kept for audit but never resolve
    pub active: bool,
    /// Unix seconds at creation
    pub created_at: u64,
    /// The administrator who created the grant
    pub created_by: UserId,
}

impl Grant {
    /// Create an active grant
    pub fn new(
        editor_id: UserId,
        scope: Scope,
        flags: PermissionFlags,
        description: Option<String>,
        created_at: u64,
        created_by: UserId,
    ) -> Self {
        Self {
            id: GrantId::new(),
            editor_id,
            scope,
            flags,
            description,
            active: true,
            created_at,
            created_by,
        }
    }

    /// One-line summary for audit logs
    pub fn summary(&self) -> String {
        format!(
            "Level: {}, Scope: {}, Permissions: {}",
            self.scope.level(),
            self.scope,
            self.flags
        )
    }
}

/// Derived capability set for one (editor, leaf) query
///
/// Recomputed on every check and never cached across grant mutations, so a
/// mutation immediately changes future results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectivePermission {
    /// Flags of the winning grant, or all false
    pub flags: PermissionFlags,
    /// Scope of the winning grant; `None` means no grant covered the leaf
    pub matched_scope: Option<Scope>,
}

impl EffectivePermission {
    /// The default-deny result
    pub fn deny() -> Self {
        Self {
            flags: PermissionFlags::none(),
            matched_scope: None,
        }
    }

    /// Result derived from a winning grant
    pub fn from_grant(grant: &Grant) -> Self {
        Self {
            flags: grant.flags,
            matched_scope: Some(grant.scope),
        }
    }

    /// Project one capability
    pub fn allows(&self, capability: Capability) -> bool {
        self.flags.allows(capability)
    }
}
