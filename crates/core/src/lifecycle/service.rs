//! Stateless rules for the transaction approval workflow.

use rust_decimal::Decimal;

use super::error::LifecycleError;
use super::types::{SubmissionInput, TransactionStatus};
use crate::transfer::Direction;

/// Stateless service enforcing the transaction lifecycle rules.
///
/// All methods are associated functions. They decide; the database layer
/// executes the decision inside its atomic scope.
pub struct LifecycleService;

impl LifecycleService {
    /// Validates an agent submission before it is persisted as pending.
    ///
    /// # Errors
    ///
    /// * `NonPositiveAmount` if `amount <= 0`
    /// * `ProofImageRequired` if no image accompanies the submission
    /// * `WithdrawalTypeRequired` for withdrawals without a withdrawal type
    pub fn validate_submission(input: &SubmissionInput) -> Result<(), LifecycleError> {
        if input.amount <= Decimal::ZERO {
            return Err(LifecycleError::NonPositiveAmount(input.amount));
        }
        if input.image_count == 0 {
            return Err(LifecycleError::ProofImageRequired);
        }
        if input.direction == Direction::Withdrawal && !input.has_withdrawal_type {
            return Err(LifecycleError::WithdrawalTypeRequired);
        }
        Ok(())
    }

    /// Guards a transition out of `pending`.
    ///
    /// Approvals and rejections both pass through this; resolving an
    /// already-resolved transaction is a state conflict, never a re-run.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyResolved` for approved/rejected transactions.
    pub fn ensure_pending(status: TransactionStatus) -> Result<(), LifecycleError> {
        match status {
            TransactionStatus::Pending => Ok(()),
            resolved => Err(LifecycleError::AlreadyResolved(resolved)),
        }
    }

    /// Validates and normalizes a rejection reason.
    ///
    /// # Errors
    ///
    /// Returns `ReasonRequired` if the reason is empty after trimming.
    pub fn rejection_reason(reason: &str) -> Result<String, LifecycleError> {
        let trimmed = reason.trim();
        if trimmed.is_empty() {
            return Err(LifecycleError::ReasonRequired);
        }
        Ok(trimmed.to_string())
    }

    /// Checks whether a transaction may still be edited in place.
    ///
    /// # Errors
    ///
    /// Returns `NotEditable` once the transaction is resolved.
    pub fn can_modify(status: TransactionStatus) -> Result<(), LifecycleError> {
        if status.is_resolved() {
            return Err(LifecycleError::NotEditable);
        }
        Ok(())
    }

    /// Checks whether an actor may soft-delete a transaction.
    ///
    /// The owning agent may delete their own pending submissions. Admins may
    /// delete anything, including resolved transactions; deleting an approved
    /// transaction hides the row but never reverses its balance effect.
    ///
    /// # Errors
    ///
    /// Returns `DeleteForbidden` when a non-admin targets a resolved
    /// transaction or one they do not own.
    pub fn can_delete(
        status: TransactionStatus,
        is_admin: bool,
        is_owner: bool,
    ) -> Result<(), LifecycleError> {
        if is_admin {
            return Ok(());
        }
        if is_owner && status == TransactionStatus::Pending {
            return Ok(());
        }
        Err(LifecycleError::DeleteForbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn submission(direction: Direction, amount: Decimal, images: usize) -> SubmissionInput {
        SubmissionInput {
            direction,
            amount,
            image_count: images,
            has_withdrawal_type: direction == Direction::Withdrawal,
        }
    }

    #[test]
    fn test_valid_deposit_submission() {
        let input = submission(Direction::Deposit, dec!(100), 1);
        assert!(LifecycleService::validate_submission(&input).is_ok());
    }

    #[test]
    fn test_submission_requires_positive_amount() {
        let input = submission(Direction::Deposit, dec!(0), 1);
        assert_eq!(
            LifecycleService::validate_submission(&input),
            Err(LifecycleError::NonPositiveAmount(dec!(0)))
        );
    }

    #[test]
    fn test_submission_requires_proof_image() {
        let input = submission(Direction::Withdrawal, dec!(50), 0);
        assert_eq!(
            LifecycleService::validate_submission(&input),
            Err(LifecycleError::ProofImageRequired)
        );
    }

    #[test]
    fn test_withdrawal_requires_withdrawal_type() {
        let input = SubmissionInput {
            direction: Direction::Withdrawal,
            amount: dec!(50),
            image_count: 2,
            has_withdrawal_type: false,
        };
        assert_eq!(
            LifecycleService::validate_submission(&input),
            Err(LifecycleError::WithdrawalTypeRequired)
        );
    }

    #[test]
    fn test_deposit_does_not_require_withdrawal_type() {
        let input = SubmissionInput {
            direction: Direction::Deposit,
            amount: dec!(50),
            image_count: 1,
            has_withdrawal_type: false,
        };
        assert!(LifecycleService::validate_submission(&input).is_ok());
    }

    #[rstest]
    #[case(TransactionStatus::Approved)]
    #[case(TransactionStatus::Rejected)]
    fn test_resolved_transactions_cannot_be_resolved_again(#[case] status: TransactionStatus) {
        assert_eq!(
            LifecycleService::ensure_pending(status),
            Err(LifecycleError::AlreadyResolved(status))
        );
    }

    #[test]
    fn test_pending_can_be_resolved() {
        assert!(LifecycleService::ensure_pending(TransactionStatus::Pending).is_ok());
    }

    #[test]
    fn test_rejection_reason_trimmed() {
        assert_eq!(
            LifecycleService::rejection_reason("  missing receipt  ").unwrap(),
            "missing receipt"
        );
        assert_eq!(
            LifecycleService::rejection_reason("   "),
            Err(LifecycleError::ReasonRequired)
        );
    }

    #[rstest]
    #[case(TransactionStatus::Approved)]
    #[case(TransactionStatus::Rejected)]
    fn test_resolved_transactions_not_editable(#[case] status: TransactionStatus) {
        assert_eq!(
            LifecycleService::can_modify(status),
            Err(LifecycleError::NotEditable)
        );
    }

    #[test]
    fn test_owner_can_delete_own_pending() {
        assert!(LifecycleService::can_delete(TransactionStatus::Pending, false, true).is_ok());
    }

    #[test]
    fn test_owner_cannot_delete_resolved() {
        assert_eq!(
            LifecycleService::can_delete(TransactionStatus::Approved, false, true),
            Err(LifecycleError::DeleteForbidden)
        );
    }

    #[test]
    fn test_admin_can_delete_anything() {
        for status in [
            TransactionStatus::Pending,
            TransactionStatus::Approved,
            TransactionStatus::Rejected,
        ] {
            assert!(LifecycleService::can_delete(status, true, false).is_ok());
        }
    }

    #[test]
    fn test_non_owner_cannot_delete_pending() {
        assert_eq!(
            LifecycleService::can_delete(TransactionStatus::Pending, false, false),
            Err(LifecycleError::DeleteForbidden)
        );
    }

    #[test]
    fn test_status_parse_round_trip() {
        for status in [
            TransactionStatus::Pending,
            TransactionStatus::Approved,
            TransactionStatus::Rejected,
        ] {
            assert_eq!(TransactionStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(TransactionStatus::parse("draft"), None);
    }
}
