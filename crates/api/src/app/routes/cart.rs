use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
    Json, Router,
};

use joyville_core::CartLineId;

use crate::app::{dto, errors};
use crate::app::services::AppServices;
use crate::context::SessionContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(get_cart).post(add_line).delete(clear_cart))
        .route("/:id", put(update_line).delete(remove_line))
}

pub async fn get_cart(
    Extension(services): Extension<Arc<AppServices>>,
    session: SessionContext,
) -> axum::response::Response {
    Json(services.cart.lines(session.token())).into_response()
}

pub async fn add_line(
    Extension(services): Extension<Arc<AppServices>>,
    session: SessionContext,
    Json(body): Json<dto::AddCartLineRequest>,
) -> axum::response::Response {
    let quantity = match dto::parse_quantity(body.quantity) {
        Ok(q) => q,
        Err(resp) => return resp,
    };

    match services
        .cart
        .add_line(session.token(), body.product_id, quantity)
    {
        Ok(line) => (StatusCode::CREATED, Json(line)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn update_line(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateCartLineRequest>,
) -> axum::response::Response {
    let line_id: CartLineId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let quantity = match dto::parse_quantity(body.quantity) {
        Ok(q) => q,
        Err(resp) => return resp,
    };

    match services.cart.update_quantity(line_id, quantity) {
        Ok(line) => Json(line).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn remove_line(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let line_id: CartLineId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.cart.remove_line(line_id) {
        Ok(()) => Json(serde_json::json!({"removed": true})).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn clear_cart(
    Extension(services): Extension<Arc<AppServices>>,
    session: SessionContext,
) -> axum::response::Response {
    services.cart.clear(session.token());
    Json(serde_json::json!({"cleared": true})).into_response()
}
