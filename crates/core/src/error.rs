//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// counter invariants, conflicts). Infrastructure concerns belong elsewhere.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed input, insufficient stock at
    /// order-validation time).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An adjustment would take `available` below zero.
    #[error("cannot reduce inventory below zero")]
    NegativeInventory,

    /// A reservation exceeds the available count on a row.
    #[error("insufficient inventory: requested {requested}, available {available}")]
    InsufficientInventory { requested: i64, available: i64 },

    /// A fulfillment exceeds the committed count on a row.
    #[error("insufficient committed inventory: requested {requested}, committed {committed}")]
    InsufficientCommitted { requested: i64, committed: i64 },

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A referenced entity is missing or outside the caller's store scope.
    #[error("{0} not found")]
    NotFound(String),

    /// A uniqueness constraint was violated (e.g. duplicate idempotency key).
    /// Callers racing on creation should treat this as "someone else already
    /// created this" and re-read.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Authorization failure at the domain boundary.
    #[error("unauthorized")]
    Unauthorized,
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }
}
