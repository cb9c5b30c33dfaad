//! Transaction lifecycle rules.
//!
//! Agent-submitted transactions move through a small state machine:
//!
//! - `pending -> approved` (balances move, audit entry written)
//! - `pending -> rejected` (balances untouched, audit entry written)
//!
//! Both outcomes are terminal. This module holds the pure rules: submission
//! validation, transition guards, and the edit/delete permission matrix. The
//! database layer executes the resulting writes atomically.

pub mod error;
pub mod service;
pub mod types;

pub use error::LifecycleError;
pub use service::LifecycleService;
pub use types::{SubmissionInput, TransactionStatus};
