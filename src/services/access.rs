//! Scope checks shared by the read services.

use domain::{CallerId, Role, RoleRecord};
use uuid::Uuid;

use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

/// Reject a caller asking for another account's records.
pub(crate) fn ensure_self(caller: CallerId, account_id: Uuid) -> AppResult<()> {
    if caller.is(account_id) {
        return Ok(());
    }
    tracing::warn!(caller = %caller, target = %account_id, "Caller outside account scope");
    Err(AppError::unauthorized(
        "You are not allowed to access this account's records",
    ))
}

/// Reject a caller whose account does not belong to `bar_id`.
pub(crate) async fn ensure_bar_scope<U: UnitOfWork + ?Sized>(
    uow: &U,
    caller: CallerId,
    bar_id: Uuid,
) -> AppResult<()> {
    let account = uow.accounts().find_by_id(caller.account_id()).await?;
    match account.and_then(|a| a.bar_scope()) {
        Some(owned) if owned == bar_id => Ok(()),
        _ => {
            tracing::warn!(caller = %caller, bar_id = %bar_id, "Caller outside bar scope");
            Err(AppError::unauthorized(
                "You are not allowed to access this bar's records",
            ))
        }
    }
}

pub(crate) async fn customer_role<U: UnitOfWork + ?Sized>(uow: &U) -> AppResult<RoleRecord> {
    uow.roles()
        .find_by_role(Role::Customer)
        .await?
        .ok_or_not_found("Customer role")
}
