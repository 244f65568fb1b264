use std::sync::Arc;

use axum::{extract::Extension, response::IntoResponse, Json};

use crate::app::services::AppServices;
use crate::context::AdminUser;

pub async fn stats(
    Extension(services): Extension<Arc<AppServices>>,
    AdminUser(_admin): AdminUser,
) -> axum::response::Response {
    Json(services.dashboard_stats()).into_response()
}
