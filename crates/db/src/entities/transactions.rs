//! `SeaORM` Entity for transactions table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{TransactionKind, TransactionStatus};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub cashbox_id: Uuid,
    pub kind: TransactionKind,
    pub amount: Decimal,
    /// Target box balance before the financial effect; zero while pending.
    pub balance_before: Decimal,
    /// Target box balance after the financial effect; zero while pending.
    pub balance_after: Decimal,
    pub status: TransactionStatus,
    /// Set on rejection.
    pub reason: Option<String>,
    pub created_by: Uuid,
    /// The admin who resolved the transaction (approve or reject).
    pub approved_by: Option<Uuid>,
    pub withdrawal_type_id: Option<Uuid>,
    pub account_number: Option<String>,
    pub phone_number: Option<String>,
    pub notes: Option<String>,
    /// Soft-deletion marker; deleted rows are hidden, never reversed.
    pub deleted_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::cash_boxes::Entity",
        from = "Column::CashboxId",
        to = "super::cash_boxes::Column::Id"
    )]
    CashBox,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::CreatedBy",
        to = "super::users::Column::Id"
    )]
    Creator,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::ApprovedBy",
        to = "super::users::Column::Id"
    )]
    Approver,
    #[sea_orm(
        belongs_to = "super::withdrawal_types::Entity",
        from = "Column::WithdrawalTypeId",
        to = "super::withdrawal_types::Column::Id"
    )]
    WithdrawalType,
    #[sea_orm(has_many = "super::transaction_media::Entity")]
    Media,
}

impl Related<super::cash_boxes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CashBox.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Creator.def()
    }
}

impl Related<super::withdrawal_types::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WithdrawalType.def()
    }
}

impl Related<super::transaction_media::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Media.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
