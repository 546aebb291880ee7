//! Domain error model.

use thiserror::Error;

use crate::money::Money;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Every variant describes a rejected mutation. The ledger that returns one
/// is guaranteed to be in the same state it was before the call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (negative amount, rate out of range, zero quantity...).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A withdrawal asked for more than the current balance.
    #[error("insufficient funds (requested: {requested}, available: {available})")]
    InsufficientFunds { requested: Money, available: Money },

    /// A sale could not be served from stock.
    #[error(transparent)]
    Stock(#[from] StockError),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn insufficient_funds(requested: Money, available: Money) -> Self {
        Self::InsufficientFunds {
            requested,
            available,
        }
    }
}

/// Inventory failure: the item is absent or there are not enough units.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StockError {
    #[error("cannot sell {item}: not in stock")]
    NotFound { item: String },

    #[error("cannot sell {item}: only {available} in stock, {requested} requested")]
    Insufficient {
        item: String,
        requested: u32,
        available: u32,
    },
}

impl StockError {
    /// Short classification of the failure.
    pub fn kind(&self) -> &'static str {
        match self {
            StockError::NotFound { .. } => "not found",
            StockError::Insufficient { .. } => "insufficient",
        }
    }
}
