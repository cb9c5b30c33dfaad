//! Typed roles and capability checks.
//!
//! Roles are parsed once at the authentication boundary; handlers and
//! repositories work with the typed value instead of comparing strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors raised by role parsing and capability checks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoleError {
    /// The stored role string is not a known role.
    #[error("unknown role: {0}")]
    Unknown(String),

    /// The operation requires the admin role.
    #[error("this operation requires the admin role")]
    AdminRequired,
}

/// User role in the cashbox system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Owns a sub cashbox; submits transactions and sees only their own data.
    Agent,
    /// Manages the main box, approves/rejects, and sees everything.
    Admin,
}

impl Role {
    /// Parses a role from its stored string form.
    ///
    /// # Errors
    ///
    /// Returns `RoleError::Unknown` for unrecognized strings.
    pub fn parse(s: &str) -> Result<Self, RoleError> {
        match s.to_lowercase().as_str() {
            "agent" => Ok(Self::Agent),
            "admin" => Ok(Self::Admin),
            other => Err(RoleError::Unknown(other.to_string())),
        }
    }

    /// Returns the string representation of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Agent => "agent",
            Self::Admin => "admin",
        }
    }

    /// Returns true for the admin role.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Capability check for admin-only operations: creating cashboxes,
    /// direct fund movements, approving and rejecting, exports.
    ///
    /// # Errors
    ///
    /// Returns `RoleError::AdminRequired` for non-admin roles.
    pub const fn require_admin(self) -> Result<(), RoleError> {
        match self {
            Self::Admin => Ok(()),
            Self::Agent => Err(RoleError::AdminRequired),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_roles() {
        assert_eq!(Role::parse("admin"), Ok(Role::Admin));
        assert_eq!(Role::parse("Agent"), Ok(Role::Agent));
    }

    #[test]
    fn test_parse_unknown_role() {
        assert_eq!(
            Role::parse("superuser"),
            Err(RoleError::Unknown("superuser".to_string()))
        );
    }

    #[test]
    fn test_require_admin() {
        assert!(Role::Admin.require_admin().is_ok());
        assert_eq!(Role::Agent.require_admin(), Err(RoleError::AdminRequired));
    }

    #[test]
    fn test_as_str_round_trip() {
        for role in [Role::Admin, Role::Agent] {
            assert_eq!(Role::parse(role.as_str()), Ok(role));
        }
    }
}
