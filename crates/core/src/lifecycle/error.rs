//! Lifecycle error types.

use rust_decimal::Decimal;
use thiserror::Error;

use super::types::TransactionStatus;

/// Errors that can occur during transaction lifecycle operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    /// Submitted amount must be strictly positive.
    #[error("transaction amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),

    /// Agent submissions require at least one proof image.
    #[error("at least one proof image is required")]
    ProofImageRequired,

    /// Withdrawal submissions must name a withdrawal type.
    #[error("a withdrawal type is required for withdrawal submissions")]
    WithdrawalTypeRequired,

    /// The transaction has already been approved or rejected.
    #[error("transaction is already {0}, only pending transactions can be resolved")]
    AlreadyResolved(TransactionStatus),

    /// Only pending transactions can be edited.
    #[error("only pending transactions can be modified")]
    NotEditable,

    /// A rejection must carry a non-empty reason.
    #[error("a rejection reason is required")]
    ReasonRequired,

    /// The actor is not allowed to delete this transaction.
    #[error("resolved transactions can only be deleted by an admin")]
    DeleteForbidden,
}
