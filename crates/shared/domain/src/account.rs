//! Account domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{DomainError, DomainResult};
use crate::role::Role;

/// Account domain entity.
///
/// Staff accounts carry the bar they work for in `bar_id`; customers and
/// admins have none.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub bar_id: Option<Uuid>,
    pub role_id: Uuid,
    pub role: Role,
    /// False until the e-mail OTP has been confirmed
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Create a new, not yet activated account.
    pub fn new(
        email: String,
        password_hash: String,
        full_name: String,
        phone: Option<String>,
        role_id: Uuid,
        role: Role,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email,
            password_hash,
            full_name,
            phone,
            bar_id: None,
            role_id,
            role,
            is_active: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Bar scope owned by this account, if any.
    pub fn bar_scope(&self) -> Option<Uuid> {
        self.bar_id
    }

    pub fn activate(&mut self) {
        self.is_active = true;
        self.updated_at = Utc::now();
    }

    /// Replace the registration details of an account that was never activated.
    pub fn refresh_registration(
        &mut self,
        password_hash: String,
        full_name: String,
        phone: Option<String>,
    ) {
        self.password_hash = password_hash;
        self.full_name = full_name;
        self.phone = phone;
        self.updated_at = Utc::now();
    }
}

/// Registration input.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterAccount {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub full_name: String,
    pub phone: Option<String>,
}

impl RegisterAccount {
    /// Reject a confirmation that does not match the password.
    pub fn ensure_passwords_match(&self) -> DomainResult<()> {
        if self.password != self.confirm_password {
            return Err(DomainError::invalid(
                "Password and confirmation password do not match",
            ));
        }
        Ok(())
    }
}

/// Account response (safe to return to client)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AccountResponse {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub bar_id: Option<Uuid>,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            email: account.email,
            full_name: account.full_name,
            phone: account.phone,
            bar_id: account.bar_id,
            role: account.role,
            is_active: account.is_active,
            created_at: account.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration(password: &str, confirm: &str) -> RegisterAccount {
        RegisterAccount {
            email: "guest@example.com".to_string(),
            password: password.to_string(),
            confirm_password: confirm.to_string(),
            full_name: "Guest".to_string(),
            phone: None,
        }
    }

    #[test]
    fn test_passwords_must_match() {
        assert!(registration("Secret123!", "Secret123!").ensure_passwords_match().is_ok());
        assert!(matches!(
            registration("Secret123!", "Secret124!").ensure_passwords_match(),
            Err(DomainError::InvalidData(_))
        ));
    }

    #[test]
    fn test_new_account_is_inactive_until_activated() {
        let mut account = Account::new(
            "guest@example.com".to_string(),
            "hash".to_string(),
            "Guest".to_string(),
            None,
            Uuid::new_v4(),
            Role::Customer,
        );
        assert!(!account.is_active);
        assert_eq!(account.bar_scope(), None);

        account.activate();
        assert!(account.is_active);
    }
}
