//! Cart line model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use joyville_catalog::Product;
use joyville_core::{CartLineId, ProductId, SessionToken};

/// One (session, product) pairing with a quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: CartLineId,
    pub session: SessionToken,
    pub product_id: ProductId,
    pub quantity: u32,
    pub created_at: DateTime<Utc>,
}

/// A cart line with its product resolved for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedCartLine {
    #[serde(flatten)]
    pub line: CartLine,
    pub product: Product,
}
