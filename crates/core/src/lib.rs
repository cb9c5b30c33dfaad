//! Core business logic for Caisse.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and balance arithmetic live here.
//!
//! # Modules
//!
//! - `transfer` - Balance transfer engine for main/sub cashbox movements
//! - `lifecycle` - Transaction state machine and submission rules
//! - `audit` - Append-only audit record types
//! - `media` - Proof image validation policy
//! - `storage` - Blob storage for proof images
//! - `auth` - Password hashing and typed role checks

pub mod audit;
pub mod auth;
pub mod lifecycle;
pub mod media;
pub mod storage;
pub mod transfer;
