//! Proof image validation policy.
//!
//! Agent submissions must carry at least one proof image; direct admin fund
//! operations may carry zero. Every accepted image must be an image MIME type
//! within the configured byte cap.

pub mod policy;

pub use policy::{MediaError, MediaPolicy, extension_for};
