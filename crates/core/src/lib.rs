//! `catalogdesk-core`: building blocks shared by the catalog crates.
//!
//! Pure types only (no IO, no HTTP).

pub mod entity;
pub mod error;
pub mod id;

pub use entity::{Entity, position_by_id};
pub use error::{DomainError, DomainResult};
pub use id::{OrderId, ProductId};
