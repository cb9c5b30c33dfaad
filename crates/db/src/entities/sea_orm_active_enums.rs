//! Postgres enum mappings.
//!
//! Each enum mirrors a `CREATE TYPE ... AS ENUM` in the initial migration.
//! Conversions to/from the pure core types live here so repositories can
//! hand core services typed values without string matching.

use caisse_core::auth::Role;
use caisse_core::lifecycle::TransactionStatus as CoreStatus;
use caisse_core::transfer::Direction;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User role (`user_role`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "user_role")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// System administrator.
    #[sea_orm(string_value = "admin")]
    Admin,
    /// Cashbox agent.
    #[sea_orm(string_value = "agent")]
    Agent,
}

impl From<UserRole> for Role {
    fn from(role: UserRole) -> Self {
        match role {
            UserRole::Admin => Self::Admin,
            UserRole::Agent => Self::Agent,
        }
    }
}

impl From<Role> for UserRole {
    fn from(role: Role) -> Self {
        match role {
            Role::Admin => Self::Admin,
            Role::Agent => Self::Agent,
        }
    }
}

/// Cashbox kind (`cash_box_kind`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "cash_box_kind")]
#[serde(rename_all = "lowercase")]
pub enum CashBoxKind {
    /// The single central cashbox.
    #[sea_orm(string_value = "main")]
    Main,
    /// An agent-owned sub cashbox.
    #[sea_orm(string_value = "sub")]
    Sub,
}

/// Transaction kind (`transaction_kind`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "transaction_kind")]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Funds flow toward the target box.
    #[sea_orm(string_value = "deposit")]
    Deposit,
    /// Funds flow out of the target box.
    #[sea_orm(string_value = "withdrawal")]
    Withdrawal,
}

impl From<TransactionKind> for Direction {
    fn from(kind: TransactionKind) -> Self {
        match kind {
            TransactionKind::Deposit => Self::Deposit,
            TransactionKind::Withdrawal => Self::Withdrawal,
        }
    }
}

impl From<Direction> for TransactionKind {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Deposit => Self::Deposit,
            Direction::Withdrawal => Self::Withdrawal,
        }
    }
}

/// Transaction status (`transaction_status`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "transaction_status")]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// Awaiting an admin decision.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Approved; balance effect landed.
    #[sea_orm(string_value = "approved")]
    Approved,
    /// Rejected; no balance effect.
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

impl From<TransactionStatus> for CoreStatus {
    fn from(status: TransactionStatus) -> Self {
        match status {
            TransactionStatus::Pending => Self::Pending,
            TransactionStatus::Approved => Self::Approved,
            TransactionStatus::Rejected => Self::Rejected,
        }
    }
}

impl From<CoreStatus> for TransactionStatus {
    fn from(status: CoreStatus) -> Self {
        match status {
            CoreStatus::Pending => Self::Pending,
            CoreStatus::Approved => Self::Approved,
            CoreStatus::Rejected => Self::Rejected,
        }
    }
}
