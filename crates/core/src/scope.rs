//! Row-visibility scoping for request listings and aggregates.

use crate::roles::Role;
use crate::types::DbId;

/// Which requests a caller may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestScope {
    /// System-wide (procurement and admin).
    All,
    /// Only requests created by this user (employees).
    OwnedBy(DbId),
}

impl RequestScope {
    pub fn for_actor(user_id: DbId, role: Role) -> Self {
        if role.sees_all_requests() {
            RequestScope::All
        } else {
            RequestScope::OwnedBy(user_id)
        }
    }

    /// The `created_by` filter to bind, if any.
    pub fn owner_filter(self) -> Option<DbId> {
        match self {
            RequestScope::All => None,
            RequestScope::OwnedBy(id) => Some(id),
        }
    }

    /// Whether a request created by `owner_id` falls inside this scope.
    pub fn permits(self, owner_id: DbId) -> bool {
        match self {
            RequestScope::All => true,
            RequestScope::OwnedBy(id) => id == owner_id,
        }
    }
}
