use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
    Json, Router,
};

use joyville_core::OrderId;
use joyville_orders::{NewOrder, OrderStatus};

use crate::app::{dto, errors};
use crate::app::services::AppServices;
use crate::context::{AdminUser, AuthedUser, SessionContext};

pub fn router() -> Router {
    Router::new()
        .route("/", post(place_order).get(list_orders))
        .route("/:id", get(get_order))
        .route("/:id/status", patch(update_status))
}

pub async fn place_order(
    Extension(services): Extension<Arc<AppServices>>,
    session: SessionContext,
    AuthedUser(principal): AuthedUser,
    Json(body): Json<NewOrder>,
) -> axum::response::Response {
    match services
        .engine
        .place_order(session.token(), principal.user_id, body)
        .await
    {
        Ok(order) => (StatusCode::CREATED, Json(order)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn list_orders(
    Extension(services): Extension<Arc<AppServices>>,
    AuthedUser(principal): AuthedUser,
) -> axum::response::Response {
    Json(services.engine.list_orders(&principal)).into_response()
}

pub async fn get_order(
    Extension(services): Extension<Arc<AppServices>>,
    AuthedUser(principal): AuthedUser,
    Path(id): Path<String>,
) -> axum::response::Response {
    let order_id: OrderId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.engine.get_order(order_id, &principal) {
        Ok(order) => Json(order).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn update_status(
    Extension(services): Extension<Arc<AppServices>>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateStatusRequest>,
) -> axum::response::Response {
    let order_id: OrderId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let target: OrderStatus = match body.status.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.engine.update_status(order_id, target) {
        Ok(order) => Json(order).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
