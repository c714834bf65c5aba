//! Account roles.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{ROLE_ADMIN, ROLE_CUSTOMER, ROLE_STAFF};

/// Role tag carried by every account. Compared by value, stored by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    Staff,
    Customer,
}

impl Role {
    /// Name stored in the `roles` table
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => ROLE_ADMIN,
            Role::Staff => ROLE_STAFF,
            Role::Customer => ROLE_CUSTOMER,
        }
    }

    /// Parse a stored role name. Unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            ROLE_ADMIN => Some(Role::Admin),
            ROLE_STAFF => Some(Role::Staff),
            ROLE_CUSTOMER => Some(Role::Customer),
            _ => None,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A row of the role lookup table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleRecord {
    pub id: Uuid,
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_names_round_trip() {
        for role in [Role::Admin, Role::Staff, Role::Customer] {
            assert_eq!(Role::from_name(role.as_str()), Some(role));
        }
    }

    #[test]
    fn test_unknown_role_name() {
        assert_eq!(Role::from_name("customer"), None);
        assert_eq!(Role::from_name("OWNER"), None);
    }

    #[test]
    fn test_role_display() {
        assert_eq!(Role::Customer.to_string(), "CUSTOMER");
        assert!(Role::Admin.is_admin());
        assert!(!Role::Staff.is_admin());
    }
}
