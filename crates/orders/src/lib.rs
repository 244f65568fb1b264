//! `joyville-orders` — the order engine.
//!
//! Converts a non-empty session cart into a durable order with frozen
//! line-item prices, then empties the cart; exposes status transitions and
//! ownership-scoped retrieval.

pub mod engine;
pub mod notify;
pub mod order;
pub mod status;

pub use engine::{DashboardStats, OrderEngine};
pub use notify::{Notifier, NoopNotifier, OrderEvent};
pub use order::{Address, CustomerInfo, NewOrder, OrderLineItem, OrderRecord, OrderWithItems};
pub use status::OrderStatus;
