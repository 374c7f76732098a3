//! Actors and roles
//!
//! Scoped grants only ever apply to editors. Administrators bypass the grant
//! system entirely and plain users are denied all scoped operations; both
//! rules live in the authorization facade, not in the grant model.

use crate::identifiers::UserId;
use serde::{Deserialize, Serialize};

/// System role of an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Full access to everything, never represented as grants
    Admin,
    /// Eligible for scoped grants
    Editor,
    /// Read-only consumer, never eligible for scoped grants
    User,
}

/// An authenticated caller performing an authorization check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// Account identifier
    pub id: UserId,
    /// Role the surrounding service authenticated this account with
    pub role: Role,
}

impl Actor {
    /// Create an actor
    pub fn new(id: UserId, role: Role) -> Self {
        Self { id, role }
    }

    /// Convenience constructor for an administrator
    pub fn admin(id: UserId) -> Self {
        Self::new(id, Role::Admin)
    }

    /// Convenience constructor for an editor
    pub fn editor(id: UserId) -> Self {
        Self::new(id, Role::Editor)
    }

    /// Whether this actor is an administrator
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Whether this actor is an editor
    pub fn is_editor(&self) -> bool {
        self.role == Role::Editor
    }
}
