//! Caller roles

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::DomainError;

/// Role of an authenticated caller.
///
/// The state machine itself is role-agnostic; use-cases declare which role
/// they expect and the transport enforces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Pickup point staff: runs receptions
    Employee,
    /// Privileged user: registers pickup points
    Moderator,
}

impl Role {
    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Employee => "employee",
            Role::Moderator => "moderator",
        }
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "employee" => Ok(Role::Employee),
            "moderator" => Ok(Role::Moderator),
            other => Err(DomainError::InvalidRole(other.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_roundtrip() {
        for role in [Role::Employee, Role::Moderator] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn test_invalid_role() {
        assert!(matches!(
            "admin".parse::<Role>(),
            Err(DomainError::InvalidRole(_))
        ));
    }
}
