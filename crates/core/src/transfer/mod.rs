//! Balance transfer engine for cashbox fund movements.
//!
//! This module is the single place where cashbox balance arithmetic happens.
//! It plans the two topologies the system supports:
//!
//! - External operations on the main box itself (funds enter or leave the
//!   system boundary)
//! - Transfers between the main box and a sub box (funds conserved within
//!   the tree)
//!
//! The planners are pure: they take current balances and produce new balances
//! plus the target-box snapshot. Persistence and locking are the database
//! layer's job.

pub mod engine;
pub mod error;
pub mod types;

#[cfg(test)]
mod engine_props;

pub use engine::TransferEngine;
pub use error::TransferError;
pub use types::{BalanceSnapshot, Direction, ExternalPlan, FundingPlan};
