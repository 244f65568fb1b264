//! `joyville-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no HTTP or storage
//! concerns): strongly-typed identifiers, the opaque session token, and the
//! shared error taxonomy.

pub mod error;
pub mod id;
pub mod session;

pub use error::{DomainError, DomainResult};
pub use id::{CartLineId, CategoryId, OrderId, OrderItemId, ProductId, UserId};
pub use session::SessionToken;
