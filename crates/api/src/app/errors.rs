use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use joyville_core::DomainError;

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::InvalidInput(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_input", msg),
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
        DomainError::EmptyCart => json_error(StatusCode::BAD_REQUEST, "empty_cart", "cart is empty"),
        DomainError::ProductUnavailable(id) => json_error(
            StatusCode::BAD_REQUEST,
            "product_unavailable",
            format!("product unavailable: {id}"),
        ),
        DomainError::InvalidStatus(s) => json_error(
            StatusCode::BAD_REQUEST,
            "invalid_status",
            format!("invalid status: {s}"),
        ),
        DomainError::InvalidTransition(msg) => {
            json_error(StatusCode::BAD_REQUEST, "invalid_transition", msg)
        }
        DomainError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        DomainError::Unauthorized => json_error(
            StatusCode::UNAUTHORIZED,
            "unauthorized",
            "authentication required",
        ),
        DomainError::Forbidden => json_error(StatusCode::FORBIDDEN, "forbidden", "forbidden"),
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
