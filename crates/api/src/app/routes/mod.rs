use axum::{routing::get, Router};

pub mod cart;
pub mod categories;
pub mod dashboard;
pub mod orders;
pub mod products;
pub mod system;

/// Router for the whole `/api` surface.
pub fn router() -> Router {
    Router::new()
        .route("/api/stream", get(system::stream))
        .route("/api/dashboard/stats", get(dashboard::stats))
        .nest("/api/cart", cart::router())
        .nest("/api/orders", orders::router())
        .nest("/api/products", products::router())
        .nest("/api/categories", categories::router())
}
