//! Lifecycle domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::transfer::Direction;

/// Status of a transaction in the approval workflow.
///
/// Valid transitions:
/// - Pending → Approved (approve)
/// - Pending → Rejected (reject)
///
/// Approved and Rejected are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// Submitted by an agent, awaiting an admin decision. Balance
    /// snapshots are placeholders until approval.
    Pending,
    /// Approved by an admin; the balance effect has landed.
    Approved,
    /// Rejected by an admin; no balance effect ever happened.
    Rejected,
}

impl TransactionStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Returns true if the transaction has reached a terminal state.
    #[must_use]
    pub const fn is_resolved(self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Validated input for an agent-submitted transaction.
#[derive(Debug, Clone)]
pub struct SubmissionInput {
    /// Deposit or withdrawal.
    pub direction: Direction,
    /// Requested amount (must be positive).
    pub amount: Decimal,
    /// Number of proof images attached to the submission.
    pub image_count: usize,
    /// Whether a withdrawal type was supplied.
    pub has_withdrawal_type: bool,
}
