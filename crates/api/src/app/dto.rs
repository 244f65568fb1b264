use serde::Deserialize;

use joyville_core::ProductId;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct AddCartLineRequest {
    pub product_id: ProductId,
    /// Signed on the wire so that a negative quantity yields a clean 400
    /// instead of a body-rejection; validated before reaching the store.
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCartLineRequest {
    pub quantity: i64,
}

/// Wire-level quantity check shared by the cart handlers.
pub fn parse_quantity(quantity: i64) -> Result<u32, axum::response::Response> {
    u32::try_from(quantity)
        .ok()
        .filter(|q| *q >= 1)
        .ok_or_else(|| {
            crate::app::errors::json_error(
                axum::http::StatusCode::BAD_REQUEST,
                "invalid_input",
                "quantity must be at least 1",
            )
        })
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

// -------------------------
// Query-string shapes
// -------------------------

#[derive(Debug, Default, Deserialize)]
pub struct ProductListQuery {
    pub section: Option<String>,
    pub category: Option<String>,
    pub search: Option<String>,
}
