//! `joyville-catalog` — product/category model and catalog storage.
//!
//! The cart and order engine consume the catalog strictly through the
//! read-only [`Catalog`] trait; the admin CRUD surface lives on the concrete
//! store.

pub mod category;
pub mod product;
pub mod store;

pub use category::{Category, NewCategory};
pub use product::{NewProduct, Product, ProductPatch, Section};
pub use store::{Catalog, InMemoryCatalog, ProductFilter};
