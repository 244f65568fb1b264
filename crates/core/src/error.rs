//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic business failures (validation,
/// missing resources, illegal state changes). Infrastructure concerns
/// belong elsewhere.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed input, quantity < 1).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A referenced resource (cart line, order, product) does not exist.
    #[error("not found")]
    NotFound,

    /// Checkout was attempted with nothing in the cart.
    #[error("cart is empty")]
    EmptyCart,

    /// A cart line references a product that is no longer purchasable.
    #[error("product unavailable: {0}")]
    ProductUnavailable(String),

    /// A status value outside the fixed order-status vocabulary.
    #[error("invalid status: {0}")]
    InvalidStatus(String),

    /// A status change not permitted by the order transition table.
    #[error("invalid transition: {0}")]
    InvalidTransition(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// No authenticated identity was presented.
    #[error("unauthorized")]
    Unauthorized,

    /// The authenticated identity lacks the required role.
    #[error("forbidden")]
    Forbidden,
}

impl DomainError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn product_unavailable(msg: impl Into<String>) -> Self {
        Self::ProductUnavailable(msg.into())
    }

    pub fn invalid_status(msg: impl Into<String>) -> Self {
        Self::InvalidStatus(msg.into())
    }

    pub fn invalid_transition(msg: impl Into<String>) -> Self {
        Self::InvalidTransition(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }
}
