//! Order lifecycle status.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use joyville_core::DomainError;

/// Order lifecycle status.
///
/// Fixed vocabulary with a monotonic-with-cancellation transition table:
/// `pending → confirmed → shipped → delivered`, with `cancelled` reachable
/// from any non-terminal state. Anything else is rejected at the boundary.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Whether `target` is a legal next state from `self`.
    pub fn can_transition_to(&self, target: OrderStatus) -> bool {
        use OrderStatus::*;
        match (self, target) {
            (Pending, Confirmed) => true,
            (Confirmed, Shipped) => true,
            (Shipped, Delivered) => true,
            (Pending | Confirmed | Shipped, Cancelled) => true,
            _ => false,
        }
    }

    /// Validate a transition, producing the typed rejection for the caller.
    pub fn transition_to(&self, target: OrderStatus) -> Result<OrderStatus, DomainError> {
        if self.can_transition_to(target) {
            Ok(target)
        } else {
            Err(DomainError::invalid_transition(format!(
                "{self} -> {target} is not allowed"
            )))
        }
    }
}

impl core::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "confirmed" => Ok(OrderStatus::Confirmed),
            "shipped" => Ok(OrderStatus::Shipped),
            "delivered" => Ok(OrderStatus::Delivered),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(DomainError::invalid_status(other)),
        }
    }
}
