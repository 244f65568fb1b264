//! Order model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use joyville_core::{OrderId, OrderItemId, ProductId, SessionToken, UserId};

use crate::status::OrderStatus;

/// Customer contact snapshot captured on the order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerInfo {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

/// Postal address snapshot captured on the order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub zip_code: String,
}

/// A persisted order.
///
/// Contact and address fields are snapshots taken at placement; the billing
/// address is never absent (it defaults to shipping when the caller omits
/// it).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub id: OrderId,
    pub user_id: UserId,
    pub session: SessionToken,
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub customer: CustomerInfo,
    pub shipping_address: Address,
    pub billing_address: Address,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// One purchased line with its price frozen at checkout time.
///
/// `price` is a copy of the catalog price at the moment the order was
/// placed; later catalog changes or deletions never alter it. `product_id`
/// is kept for display only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLineItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub quantity: u32,
    pub price: Decimal,
}

/// An order with its line items, as returned by the engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderWithItems {
    #[serde(flatten)]
    pub order: OrderRecord,
    pub items: Vec<OrderLineItem>,
}

/// Checkout input: everything `place_order` needs besides session/identity.
#[derive(Debug, Clone, Deserialize)]
pub struct NewOrder {
    pub customer: CustomerInfo,
    pub shipping_address: Address,
    /// Defaults to the shipping address when omitted.
    pub billing_address: Option<Address>,
    pub notes: Option<String>,
}
