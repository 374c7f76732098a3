//! Core types for the Folio document catalog
//!
//! This crate provides the identifier newtypes, actor/role model, leaf chain,
//! and unified error type shared by the catalog and authorization crates.

pub mod actor;
pub mod chain;
pub mod errors;
pub mod identifiers;

pub use actor::{Actor, Role};
pub use chain::LeafChain;
pub use errors::{FolioError, Result};
pub use identifiers::{
    FieldId, GrantId, ManufacturerId, ProductId, SeriesId, UserId, YearId,
};
