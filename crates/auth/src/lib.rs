//! `joyville-auth` — pure authentication/authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage. Credential
//! storage and token issuance live outside the core; what arrives here is an
//! already-decoded claims object, validated deterministically.

pub mod authorize;
pub mod claims;
pub mod principal;
pub mod role;

pub use authorize::{require_admin, AuthzError};
pub use claims::{validate_claims, JwtClaims, TokenValidationError};
pub use principal::Principal;
pub use role::Role;
