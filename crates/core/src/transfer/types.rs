//! Transfer domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a fund movement, as seen from the target cashbox.
///
/// - `Deposit`: funds flow toward the target box (from main, or from outside
///   the system when the target is main itself).
/// - `Withdrawal`: funds flow out of the target box back to main (or out of
///   the system when the target is main itself).
///
/// This is also the kind recorded on the resulting transaction row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Funds flow toward the target box.
    Deposit,
    /// Funds flow out of the target box.
    Withdrawal,
}

impl Direction {
    /// Returns the string representation of the direction.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Deposit => "deposit",
            Self::Withdrawal => "withdrawal",
        }
    }

    /// Parses a direction from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "deposit" => Some(Self::Deposit),
            "withdrawal" => Some(Self::Withdrawal),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Balance snapshot of the target cashbox around a fund movement.
///
/// `before` is captured from the pre-mutation balance inside the planning
/// step, never reconstructed arithmetically after the write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceSnapshot {
    /// Target box balance immediately before the movement.
    pub before: Decimal,
    /// Target box balance immediately after the movement.
    pub after: Decimal,
}

/// Planned external operation on the main box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExternalPlan {
    /// New main box balance.
    pub main_after: Decimal,
    /// Snapshot recorded on the transaction row (target box is main).
    pub snapshot: BalanceSnapshot,
}

/// Planned transfer between the main box and a sub box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FundingPlan {
    /// New main box balance.
    pub main_after: Decimal,
    /// New sub box balance.
    pub sub_after: Decimal,
    /// Snapshot recorded on the transaction row (target box is the sub box).
    pub snapshot: BalanceSnapshot,
}
