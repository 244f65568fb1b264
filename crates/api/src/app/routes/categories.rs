use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use joyville_catalog::NewCategory;

use crate::app::errors;
use crate::app::services::AppServices;
use crate::context::AdminUser;

pub fn router() -> Router {
    Router::new().route("/", get(list_categories).post(create_category))
}

pub async fn list_categories(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    Json(services.catalog.list_categories()).into_response()
}

pub async fn create_category(
    Extension(services): Extension<Arc<AppServices>>,
    AdminUser(_admin): AdminUser,
    Json(body): Json<NewCategory>,
) -> axum::response::Response {
    match services.catalog.insert_category(body) {
        Ok(category) => (StatusCode::CREATED, Json(category)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
