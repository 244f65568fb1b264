//! Pure authorization checks.

use thiserror::Error;

use crate::Principal;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("forbidden: requires superadmin role")]
    Forbidden,
}

/// Require the superadmin role.
///
/// - No IO
/// - No panics
/// - No business logic (pure policy check)
pub fn require_admin(principal: &Principal) -> Result<(), AuthzError> {
    if principal.is_admin() {
        Ok(())
    } else {
        Err(AuthzError::Forbidden)
    }
}
