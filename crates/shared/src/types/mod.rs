//! Common types used across the application.

pub mod pagination;

pub use pagination::{PageRequest, PageResponse};
