//! `joyville-api` — HTTP surface for the Joyville storefront.

pub mod app;
pub mod context;
