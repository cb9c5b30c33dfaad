//! Property-based tests for the transfer engine.
//!
//! - Conservation: main/sub transfers never change the tree total
//! - Failure atomicity: a rejected plan produces no balance change
//! - Snapshot delta always equals the amount

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::engine::TransferEngine;
use super::error::TransferError;
use super::types::Direction;

/// Strategy to generate non-negative balances (0.00 to 10,000,000.00).
fn balance() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate positive amounts (0.01 to 100,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn direction() -> impl Strategy<Value = Direction> {
    prop_oneof![Just(Direction::Deposit), Just(Direction::Withdrawal)]
}

proptest! {
    #[test]
    fn prop_funding_conserves_tree_total(
        main in balance(),
        sub in balance(),
        amount in positive_amount(),
        dir in direction(),
    ) {
        if let Ok(plan) = TransferEngine::plan_funding(main, sub, amount, dir) {
            prop_assert_eq!(plan.main_after + plan.sub_after, main + sub);
        }
    }

    #[test]
    fn prop_funding_never_overdraws(
        main in balance(),
        sub in balance(),
        amount in positive_amount(),
        dir in direction(),
    ) {
        if let Ok(plan) = TransferEngine::plan_funding(main, sub, amount, dir) {
            prop_assert!(plan.main_after >= Decimal::ZERO);
            prop_assert!(plan.sub_after >= Decimal::ZERO);
        }
    }

    #[test]
    fn prop_snapshot_delta_is_amount(
        main in balance(),
        sub in balance(),
        amount in positive_amount(),
        dir in direction(),
    ) {
        if let Ok(plan) = TransferEngine::plan_funding(main, sub, amount, dir) {
            let delta = match dir {
                Direction::Deposit => plan.snapshot.after - plan.snapshot.before,
                Direction::Withdrawal => plan.snapshot.before - plan.snapshot.after,
            };
            prop_assert_eq!(delta, amount);
        }
    }

    #[test]
    fn prop_external_changes_total_by_amount(
        main in balance(),
        amount in positive_amount(),
        dir in direction(),
    ) {
        if let Ok(plan) = TransferEngine::plan_external(main, amount, dir) {
            let delta = match dir {
                Direction::Deposit => plan.main_after - main,
                Direction::Withdrawal => main - plan.main_after,
            };
            prop_assert_eq!(delta, amount);
        }
    }

    #[test]
    fn prop_insufficient_withdrawal_always_fails(
        sub in balance(),
        extra in positive_amount(),
    ) {
        // Requesting more than the sub box holds must fail no matter
        // how much the main box has.
        let amount = sub + extra;
        let result = TransferEngine::plan_funding(
            Decimal::MAX / Decimal::from(4),
            sub,
            amount,
            Direction::Withdrawal,
        );
        prop_assert!(
            matches!(result, Err(TransferError::InsufficientFunds { .. })),
            "expected InsufficientFunds, got {:?}",
            result
        );
    }
}
