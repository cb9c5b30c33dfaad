//! Authentication and authorization primitives.
//!
//! - `password` - Argon2id hashing and verification
//! - `role` - Typed role/capability checks (no string comparison in handlers)

pub mod password;
pub mod role;

pub use password::{PasswordError, hash_password, verify_password};
pub use role::{Role, RoleError};
