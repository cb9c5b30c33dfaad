//! Append-only audit trail types.
//!
//! One record is written for every approve/reject decision. Records are
//! forensic only; balances are never derived from them.

pub mod types;

pub use types::{AuditAction, AuditRecord};
