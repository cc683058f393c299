//! User roles.
//!
//! Role names are stored as text in `users.role` and embedded in JWT claims.
//! The string constants must match the CHECK constraint in
//! `20260101000001_create_reference_tables.sql`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const ROLE_EMPLOYEE: &str = "employee";
pub const ROLE_PROCUREMENT: &str = "procurement";
pub const ROLE_ADMIN: &str = "admin";

/// All valid role names.
pub const VALID_ROLES: &[&str] = &[ROLE_EMPLOYEE, ROLE_PROCUREMENT, ROLE_ADMIN];

/// Closed set of roles a user can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Employee,
    Procurement,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Employee => ROLE_EMPLOYEE,
            Role::Procurement => ROLE_PROCUREMENT,
            Role::Admin => ROLE_ADMIN,
        }
    }

    /// Whether this role may approve or reject requests.
    pub fn is_reviewer(self) -> bool {
        matches!(self, Role::Procurement | Role::Admin)
    }

    /// Whether this role sees every request rather than only its own.
    pub fn sees_all_requests(self) -> bool {
        self.is_reviewer()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_EMPLOYEE => Ok(Role::Employee),
            ROLE_PROCUREMENT => Ok(Role::Procurement),
            ROLE_ADMIN => Ok(Role::Admin),
            other => Err(CoreError::Validation(format!(
                "Invalid role '{other}'. Must be one of: {}",
                VALID_ROLES.join(", ")
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips_every_role() {
        for name in VALID_ROLES {
            let role: Role = name.parse().unwrap();
            assert_eq!(role.as_str(), *name);
        }
    }

    #[test]
    fn unknown_role_is_rejected() {
        let err = "superuser".parse::<Role>().unwrap_err();
        assert!(err.to_string().contains("Invalid role 'superuser'"));
    }

    #[test]
    fn only_procurement_and_admin_review() {
        assert!(!Role::Employee.is_reviewer());
        assert!(Role::Procurement.is_reviewer());
        assert!(Role::Admin.is_reviewer());
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&Role::Procurement).unwrap();
        assert_eq!(json, "\"procurement\"");
    }
}
