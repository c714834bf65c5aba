//! Caller identity.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account id of the principal performing an operation.
///
/// Resolved once per request by the HTTP layer and passed explicitly into
/// every service operation that touches another party's data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallerId(Uuid);

impl CallerId {
    pub fn new(account_id: Uuid) -> Self {
        Self(account_id)
    }

    pub fn account_id(&self) -> Uuid {
        self.0
    }

    /// True when the caller is the given account.
    pub fn is(&self, account_id: Uuid) -> bool {
        self.0 == account_id
    }
}

impl From<Uuid> for CallerId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for CallerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
