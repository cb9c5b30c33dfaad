//! Audit record types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;
use uuid::Uuid;

use crate::transfer::Direction;

/// Kinds of audited actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// A pending transaction was approved.
    ApproveTransaction,
    /// A pending transaction was rejected.
    RejectTransaction,
}

impl AuditAction {
    /// Returns the stable string tag stored in the audit log.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ApproveTransaction => "approve_transaction",
            Self::RejectTransaction => "reject_transaction",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An audit record ready to be appended.
#[derive(Debug, Clone)]
pub struct AuditRecord {
    /// The admin who performed the action.
    pub actor: Uuid,
    /// What was done.
    pub action: AuditAction,
    /// Entity type tag (always "transaction" for lifecycle actions).
    pub entity: &'static str,
    /// Target entity id.
    pub entity_id: Uuid,
    /// Free-form snapshot of the action.
    pub metadata: serde_json::Value,
}

impl AuditRecord {
    /// Builds the record for an approval, capturing amount and kind.
    #[must_use]
    pub fn transaction_approved(
        actor: Uuid,
        transaction_id: Uuid,
        amount: Decimal,
        direction: Direction,
    ) -> Self {
        Self {
            actor,
            action: AuditAction::ApproveTransaction,
            entity: "transaction",
            entity_id: transaction_id,
            metadata: json!({
                "amount": amount,
                "type": direction.as_str(),
            }),
        }
    }

    /// Builds the record for a rejection, capturing the reason.
    #[must_use]
    pub fn transaction_rejected(actor: Uuid, transaction_id: Uuid, reason: &str) -> Self {
        Self {
            actor,
            action: AuditAction::RejectTransaction,
            entity: "transaction",
            entity_id: transaction_id,
            metadata: json!({ "reason": reason }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_approval_record_metadata() {
        let actor = Uuid::new_v4();
        let tx = Uuid::new_v4();
        let record =
            AuditRecord::transaction_approved(actor, tx, dec!(1500.50), Direction::Withdrawal);

        assert_eq!(record.action, AuditAction::ApproveTransaction);
        assert_eq!(record.entity, "transaction");
        assert_eq!(record.entity_id, tx);
        assert_eq!(record.metadata["type"], "withdrawal");
        assert_eq!(record.metadata["amount"], json!(dec!(1500.50)));
    }

    #[test]
    fn test_rejection_record_metadata() {
        let record =
            AuditRecord::transaction_rejected(Uuid::new_v4(), Uuid::new_v4(), "blurry photo");

        assert_eq!(record.action, AuditAction::RejectTransaction);
        assert_eq!(record.metadata["reason"], "blurry photo");
    }

    #[test]
    fn test_action_tags_are_stable() {
        assert_eq!(AuditAction::ApproveTransaction.as_str(), "approve_transaction");
        assert_eq!(AuditAction::RejectTransaction.as_str(), "reject_transaction");
    }
}
