//! `joyville-cart` — session-scoped shopping cart.
//!
//! Each anonymous session owns at most one cart; within a cart there is at
//! most one line per product (adding an existing product merges quantities).

pub mod line;
pub mod store;

pub use line::{CartLine, ResolvedCartLine};
pub use store::CartStore;
