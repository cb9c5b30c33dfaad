//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - Repository abstractions for data access
//! - Database migrations
//!
//! Every balance-affecting operation (direct funding, approval) runs inside a
//! single database transaction with `SELECT ... FOR UPDATE` row locks on the
//! cashboxes involved, so concurrent approvals against the same box cannot
//! produce lost updates.

pub mod entities;
pub mod migration;
pub mod repositories;

pub use repositories::{
    AuditLogRepository, CashBoxRepository, TransactionRepository, UserRepository,
    WithdrawalTypeRepository, cashbox::resolve_main_box,
};

use sea_orm::{Database, DatabaseConnection, DbErr};

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}
