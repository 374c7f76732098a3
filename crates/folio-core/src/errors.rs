//! Unified error system for Folio
//!
//! One error type covers the catalog and authorization crates. Domain
//! variants carry typed identifiers so callers can act on them (for example,
//! a conflict names the existing grant the administrator should update).

use crate::identifiers::GrantId;
use serde::{Deserialize, Serialize};

/// Unified error type for all Folio operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum FolioError {
    /// A leaf chain passed to resolution was not fully populated.
    ///
    /// Always a caller bug, never retried.
    #[error("Invalid leaf chain: {message}")]
    InvalidChain {
        /// What was missing or inconsistent about the chain
        message: String,
    },

    /// A scope's identifiers do not form a contiguous prefix of the taxonomy
    #[error("Malformed scope: {message}")]
    MalformedScope {
        /// Which level broke the prefix
        message: String,
    },

    /// A scope references a catalog node that does not exist
    #[error("Catalog node not found: {node}")]
    NodeNotFound {
        /// Display form of the missing node reference
        node: String,
    },

    /// Another active grant for the same editor already covers this scope
    #[error("Conflicting grant already exists: {existing}")]
    ConflictingGrant {
        /// The grant the administrator should update instead
        existing: GrantId,
    },

    /// Transient backend failure; callers may retry
    #[error("Store unavailable: {message}")]
    StoreUnavailable {
        /// Description of the transient failure
        message: String,
    },

    /// Entity lookup failed
    #[error("Not found: {message}")]
    NotFound {
        /// What was not found
        message: String,
    },

    /// Caller lacks the role required for the operation
    #[error("Permission denied: {message}")]
    PermissionDenied {
        /// Why the operation was refused
        message: String,
    },

    /// Internal invariant violation; signals corrupted state, not denial
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the violated invariant
        message: String,
    },
}

impl FolioError {
    /// Create an invalid chain error
    pub fn invalid_chain(message: impl Into<String>) -> Self {
        Self::InvalidChain {
            message: message.into(),
        }
    }

    /// Create a malformed scope error
    pub fn malformed_scope(message: impl Into<String>) -> Self {
        Self::MalformedScope {
            message: message.into(),
        }
    }

    /// Create a node not found error
    pub fn node_not_found(node: impl Into<String>) -> Self {
        Self::NodeNotFound { node: node.into() }
    }

    /// Create a conflicting grant error naming the existing grant
    pub fn conflicting_grant(existing: GrantId) -> Self {
        Self::ConflictingGrant { existing }
    }

    /// Create a store unavailable error
    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Self::StoreUnavailable {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a permission denied error
    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::PermissionDenied {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether a caller may reasonably retry the failed operation
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StoreUnavailable { .. })
    }
}

/// Standard Result type for Folio operations
pub type Result<T> = std::result::Result<T, FolioError>;
