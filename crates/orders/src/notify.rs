//! Best-effort order lifecycle notifications.
//!
//! The engine depends only on the [`Notifier`] capability; the concrete
//! fan-out mechanism (broadcast channel, message broker) is an external
//! collaborator. Delivery is fire-and-forget: no acknowledgment, no retry,
//! and a failed delivery never affects the outcome of the operation that
//! emitted it.

use serde::Serialize;

use crate::order::OrderRecord;

/// Order lifecycle event, serialized as `{"type": ..., "order": ...}`.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OrderEvent {
    OrderCreated { order: OrderRecord },
    OrderStatusUpdated { order: OrderRecord },
}

impl OrderEvent {
    pub fn topic(&self) -> &'static str {
        match self {
            OrderEvent::OrderCreated { .. } => "order_created",
            OrderEvent::OrderStatusUpdated { .. } => "order_status_updated",
        }
    }
}

/// Fire-and-forget event delivery.
///
/// Implementations must not block meaningfully and must swallow their own
/// failures (logging them is fine).
pub trait Notifier: Send + Sync {
    fn notify(&self, event: OrderEvent);
}

/// Notifier that drops everything (tests, or running without listeners).
#[derive(Debug, Default)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, _event: OrderEvent) {}
}
