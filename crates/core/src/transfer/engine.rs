//! Stateless planner for cashbox balance movements.

use rust_decimal::Decimal;

use super::error::TransferError;
use super::types::{BalanceSnapshot, Direction, ExternalPlan, FundingPlan};

/// Stateless engine that plans balance movements.
///
/// Both planners validate the amount, check sufficiency against the debited
/// box, and compute the resulting balances. A caller executes the plan inside
/// a single database transaction so either every write lands or none do.
pub struct TransferEngine;

impl TransferEngine {
    /// Plans an external operation on the main box itself.
    ///
    /// Deposits inject funds into the system; withdrawals remove them,
    /// guarded against the main box's own balance.
    ///
    /// # Errors
    ///
    /// * `TransferError::NonPositiveAmount` if `amount <= 0`
    /// * `TransferError::InsufficientFunds` if a withdrawal exceeds the main balance
    pub fn plan_external(
        main_balance: Decimal,
        amount: Decimal,
        direction: Direction,
    ) -> Result<ExternalPlan, TransferError> {
        Self::validate_amount(amount)?;

        let main_after = match direction {
            Direction::Deposit => main_balance + amount,
            Direction::Withdrawal => {
                Self::check_sufficient(main_balance, amount)?;
                main_balance - amount
            }
        };

        Ok(ExternalPlan {
            main_after,
            snapshot: BalanceSnapshot {
                before: main_balance,
                after: main_after,
            },
        })
    }

    /// Plans a transfer between the main box and a sub box.
    ///
    /// Deposits move funds main → sub (guarded against main); withdrawals
    /// move funds sub → main (guarded against the sub box). The snapshot
    /// describes the sub box, which is where the transaction row is attached.
    ///
    /// # Errors
    ///
    /// * `TransferError::NonPositiveAmount` if `amount <= 0`
    /// * `TransferError::InsufficientFunds` if the debited box cannot cover `amount`
    pub fn plan_funding(
        main_balance: Decimal,
        sub_balance: Decimal,
        amount: Decimal,
        direction: Direction,
    ) -> Result<FundingPlan, TransferError> {
        Self::validate_amount(amount)?;

        let (main_after, sub_after) = match direction {
            Direction::Deposit => {
                Self::check_sufficient(main_balance, amount)?;
                (main_balance - amount, sub_balance + amount)
            }
            Direction::Withdrawal => {
                Self::check_sufficient(sub_balance, amount)?;
                (main_balance + amount, sub_balance - amount)
            }
        };

        Ok(FundingPlan {
            main_after,
            sub_after,
            snapshot: BalanceSnapshot {
                before: sub_balance,
                after: sub_after,
            },
        })
    }

    fn validate_amount(amount: Decimal) -> Result<(), TransferError> {
        if amount <= Decimal::ZERO {
            return Err(TransferError::NonPositiveAmount(amount));
        }
        Ok(())
    }

    fn check_sufficient(available: Decimal, requested: Decimal) -> Result<(), TransferError> {
        if available < requested {
            return Err(TransferError::InsufficientFunds {
                available,
                requested,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_fund_sub_box_moves_amount_from_main() {
        // Main 10000, sub 0, deposit 3000 -> main 7000, sub 3000
        let plan =
            TransferEngine::plan_funding(dec!(10000), dec!(0), dec!(3000), Direction::Deposit)
                .unwrap();

        assert_eq!(plan.main_after, dec!(7000));
        assert_eq!(plan.sub_after, dec!(3000));
        assert_eq!(plan.snapshot.before, dec!(0));
        assert_eq!(plan.snapshot.after, dec!(3000));
    }

    #[test]
    fn test_withdrawal_returns_funds_to_main() {
        let plan =
            TransferEngine::plan_funding(dec!(500), dec!(2000), dec!(750), Direction::Withdrawal)
                .unwrap();

        assert_eq!(plan.main_after, dec!(1250));
        assert_eq!(plan.sub_after, dec!(1250));
        assert_eq!(plan.snapshot.before, dec!(2000));
        assert_eq!(plan.snapshot.after, dec!(1250));
    }

    #[test]
    fn test_funding_conserves_total() {
        let main = dec!(10000);
        let sub = dec!(1234.56);
        let plan =
            TransferEngine::plan_funding(main, sub, dec!(987.65), Direction::Deposit).unwrap();

        assert_eq!(plan.main_after + plan.sub_after, main + sub);
    }

    #[test]
    fn test_deposit_guarded_against_main_balance() {
        let err = TransferEngine::plan_funding(dec!(100), dec!(0), dec!(200), Direction::Deposit)
            .unwrap_err();

        assert_eq!(
            err,
            TransferError::InsufficientFunds {
                available: dec!(100),
                requested: dec!(200),
            }
        );
    }

    #[test]
    fn test_withdrawal_guarded_against_sub_balance() {
        // Sub box holds 500, agent asks for 2000: refused regardless of main.
        let err =
            TransferEngine::plan_funding(dec!(10000), dec!(500), dec!(2000), Direction::Withdrawal)
                .unwrap_err();

        assert_eq!(
            err,
            TransferError::InsufficientFunds {
                available: dec!(500),
                requested: dec!(2000),
            }
        );
    }

    #[test]
    fn test_external_deposit_increases_main() {
        let plan = TransferEngine::plan_external(dec!(100), dec!(50), Direction::Deposit).unwrap();

        assert_eq!(plan.main_after, dec!(150));
        assert_eq!(plan.snapshot.before, dec!(100));
        assert_eq!(plan.snapshot.after, dec!(150));
    }

    #[test]
    fn test_external_withdrawal_decreases_main() {
        // Admin pulls 500 out of the system from the main box directly.
        let plan =
            TransferEngine::plan_external(dec!(10000), dec!(500), Direction::Withdrawal).unwrap();

        assert_eq!(plan.main_after, dec!(9500));
        assert_eq!(plan.snapshot.before, dec!(10000));
        assert_eq!(plan.snapshot.after, dec!(9500));
    }

    #[test]
    fn test_external_withdrawal_insufficient() {
        let err = TransferEngine::plan_external(dec!(100), dec!(100.01), Direction::Withdrawal)
            .unwrap_err();

        assert!(matches!(err, TransferError::InsufficientFunds { .. }));
    }

    #[test]
    fn test_exact_balance_withdrawal_allowed() {
        let plan =
            TransferEngine::plan_external(dec!(100), dec!(100), Direction::Withdrawal).unwrap();
        assert_eq!(plan.main_after, dec!(0));
    }

    #[test]
    fn test_zero_and_negative_amounts_rejected() {
        for amount in [dec!(0), dec!(-1)] {
            let err =
                TransferEngine::plan_external(dec!(100), amount, Direction::Deposit).unwrap_err();
            assert_eq!(err, TransferError::NonPositiveAmount(amount));

            let err =
                TransferEngine::plan_funding(dec!(100), dec!(100), amount, Direction::Withdrawal)
                    .unwrap_err();
            assert_eq!(err, TransferError::NonPositiveAmount(amount));
        }
    }

    #[test]
    fn test_snapshot_delta_equals_amount() {
        let amount = dec!(42.42);

        let deposit =
            TransferEngine::plan_funding(dec!(1000), dec!(10), amount, Direction::Deposit).unwrap();
        assert_eq!(deposit.snapshot.after - deposit.snapshot.before, amount);

        let withdrawal =
            TransferEngine::plan_funding(dec!(0), dec!(100), amount, Direction::Withdrawal)
                .unwrap();
        assert_eq!(
            withdrawal.snapshot.before - withdrawal.snapshot.after,
            amount
        );
    }

    #[test]
    fn test_direction_parse_round_trip() {
        assert_eq!(Direction::parse("deposit"), Some(Direction::Deposit));
        assert_eq!(Direction::parse("WITHDRAWAL"), Some(Direction::Withdrawal));
        assert_eq!(Direction::parse("transfer"), None);
        assert_eq!(Direction::Deposit.as_str(), "deposit");
    }
}
