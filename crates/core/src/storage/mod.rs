//! Blob storage for proof images.
//!
//! Wraps an OpenDAL operator so the rest of the system never cares whether
//! images land on the local filesystem (development) or an S3-compatible
//! bucket (production).

pub mod config;
pub mod error;
pub mod service;

pub use config::{StorageConfig, StorageProvider};
pub use error::StorageError;
pub use service::StorageService;
