use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use joyville_catalog::{Catalog, NewProduct, ProductFilter, ProductPatch};
use joyville_core::{CategoryId, ProductId};

use crate::app::{dto, errors};
use crate::app::services::AppServices;
use crate::context::AdminUser;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
}

pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::ProductListQuery>,
) -> axum::response::Response {
    let mut filter = ProductFilter {
        search: query.search,
        ..Default::default()
    };

    if let Some(section) = query.section.as_deref() {
        filter.section = match section.parse() {
            Ok(v) => Some(v),
            Err(e) => return errors::domain_error_to_response(e),
        };
    }
    if let Some(category) = query.category.as_deref() {
        filter.category_id = match category.parse::<CategoryId>() {
            Ok(v) => Some(v),
            Err(e) => return errors::domain_error_to_response(e),
        };
    }

    Json(services.catalog.list_products(&filter)).into_response()
}

pub async fn get_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let product_id: ProductId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.catalog.product(product_id) {
        Some(product) => Json(product).into_response(),
        None => errors::json_error(StatusCode::NOT_FOUND, "not_found", "product not found"),
    }
}

pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    AdminUser(_admin): AdminUser,
    Json(body): Json<NewProduct>,
) -> axum::response::Response {
    match services.catalog.insert_product(body) {
        Ok(product) => (StatusCode::CREATED, Json(product)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn update_product(
    Extension(services): Extension<Arc<AppServices>>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<String>,
    Json(body): Json<ProductPatch>,
) -> axum::response::Response {
    let product_id: ProductId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.catalog.update_product(product_id, body) {
        Ok(product) => Json(product).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn delete_product(
    Extension(services): Extension<Arc<AppServices>>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<String>,
) -> axum::response::Response {
    let product_id: ProductId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    // Soft delete: keeps the product resolvable for order history.
    match services.catalog.deactivate_product(product_id) {
        Ok(_) => Json(serde_json::json!({"deleted": true})).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
