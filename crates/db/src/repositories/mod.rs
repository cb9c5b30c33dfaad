//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod audit;
pub mod cashbox;
pub mod transaction;
pub mod user;
pub mod withdrawal_type;

pub use audit::AuditLogRepository;
pub use cashbox::{CashBoxError, CashBoxRepository, CreateCashBoxInput, FundInput, FundOutcome};
pub use transaction::{
    ExportRow, SubmitTransactionInput, TransactionError, TransactionFilter, TransactionRepository,
    TransactionStats, TransactionWithMedia, UpdateTransactionInput,
};
pub use user::UserRepository;
pub use withdrawal_type::{WithdrawalTypeError, WithdrawalTypeRepository};
