//! Request context extractors.
//!
//! Identity is never ambient: handlers declare what they need via these
//! extractors and the core operations receive session/identity as explicit
//! arguments.

use std::sync::Arc;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap, StatusCode},
    response::Response,
};
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};

use joyville_auth::{require_admin, validate_claims, JwtClaims, Principal};
use joyville_core::SessionToken;

use crate::app::errors;

/// Header carrying the anonymous shopping-session token.
pub const SESSION_HEADER: &str = "x-session-token";

/// JWT verification state, injected as an Extension at router build time.
#[derive(Clone)]
pub struct AuthState {
    pub jwt_secret: Arc<Vec<u8>>,
}

impl AuthState {
    pub fn new(jwt_secret: impl Into<Vec<u8>>) -> Self {
        Self {
            jwt_secret: Arc::new(jwt_secret.into()),
        }
    }
}

/// The anonymous shopping session a request acts on.
///
/// Required by all cart endpoints and by checkout; rejects with 400 when the
/// header is missing or blank.
#[derive(Debug, Clone)]
pub struct SessionContext(SessionToken);

impl SessionContext {
    pub fn token(&self) -> &SessionToken {
        &self.0
    }
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for SessionContext {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(SESSION_HEADER)
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                errors::json_error(
                    StatusCode::BAD_REQUEST,
                    "missing_session",
                    format!("{SESSION_HEADER} header is required"),
                )
            })?;

        Ok(Self(SessionToken::new(token)))
    }
}

/// An authenticated identity (customer or superadmin).
///
/// Verifies the bearer JWT signature and claims window; rejects with 401.
#[derive(Debug, Clone)]
pub struct AuthedUser(pub Principal);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for AuthedUser {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth = parts
            .extensions
            .get::<AuthState>()
            .cloned()
            .ok_or_else(|| {
                errors::json_error(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "misconfigured",
                    "auth state not wired into the router",
                )
            })?;

        let token = extract_bearer(&parts.headers).ok_or_else(unauthorized)?;

        // Claims carry their own issued_at/expires_at; the time window is
        // validated deterministically below, not by the decoder.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let decoded = jsonwebtoken::decode::<JwtClaims>(
            token,
            &DecodingKey::from_secret(&auth.jwt_secret),
            &validation,
        )
        .map_err(|e| {
            tracing::debug!("jwt rejected: {e}");
            unauthorized()
        })?;

        validate_claims(&decoded.claims, Utc::now()).map_err(|e| {
            tracing::debug!("jwt claims rejected: {e}");
            unauthorized()
        })?;

        Ok(Self(decoded.claims.principal()))
    }
}

/// An authenticated superadmin; 401 without identity, 403 without the role.
#[derive(Debug, Clone)]
pub struct AdminUser(pub Principal);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for AdminUser {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthedUser(principal) = AuthedUser::from_request_parts(parts, state).await?;
        require_admin(&principal).map_err(|e| {
            errors::json_error(StatusCode::FORBIDDEN, "forbidden", e.to_string())
        })?;
        Ok(Self(principal))
    }
}

fn unauthorized() -> Response {
    errors::json_error(
        StatusCode::UNAUTHORIZED,
        "unauthorized",
        "authentication required",
    )
}

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(axum::http::header::AUTHORIZATION)?.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}
