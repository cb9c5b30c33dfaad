//! `SeaORM` entity definitions.

pub mod audit_logs;
pub mod cash_boxes;
pub mod sea_orm_active_enums;
pub mod transaction_media;
pub mod transactions;
pub mod users;
pub mod withdrawal_types;
