//! Transfer error types.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur when planning a fund movement.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransferError {
    /// Amount must be strictly positive.
    #[error("transfer amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),

    /// The debited box does not hold enough funds.
    #[error("insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds {
        /// Balance of the box being debited.
        available: Decimal,
        /// Amount requested.
        requested: Decimal,
    },
}
