//! Hierarchical scoped permissions
//!
//! Administrators grant editors narrow upload/edit/delete/view rights
//! anchored at any level of the catalog taxonomy. Given an editor and a
//! product, the resolution engine selects the most specific covering grant
//! and derives the editor's effective capability set; everything else in the
//! system goes through the [`Authorizer`] facade, which layers the
//! admin-bypass and editor-only rules on top.

pub mod engine;
pub mod facade;
pub mod grant;
pub mod scope;
pub mod service;
pub mod store;
pub mod validator;

pub use engine::{resolve_among, ResolutionEngine};
pub use facade::Authorizer;
pub use grant::{Capability, EffectivePermission, Grant, PermissionFlags};
pub use scope::{Scope, ScopeLevel};
pub use service::{
    CreateGrantRequest, GrantService, InMemoryUserDirectory, UpdateGrantRequest, UserDirectory,
};
pub use store::{GrantStore, InMemoryGrantStore};
pub use validator::GrantValidator;
