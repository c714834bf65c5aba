//! JWT authentication middleware and the caller extractor.

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use domain::{CallerId, Role};
use uuid::Uuid;

use crate::api::AppState;
use crate::config::BEARER_TOKEN_PREFIX;
use crate::errors::AppError;

/// Authenticated account extracted from the JWT.
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
    pub bar_id: Option<Uuid>,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Identity handed to the services.
    pub fn caller(&self) -> CallerId {
        CallerId::new(self.id)
    }
}

/// Reads the `CurrentUser` left by `auth_middleware`. Routes outside the
/// middleware get `UnAuthorized`.
#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(|| AppError::unauthorized("Authentication required"))
    }
}

/// JWT authentication middleware.
///
/// Validates the bearer token and injects the `CurrentUser` into the
/// request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix(BEARER_TOKEN_PREFIX))
        .ok_or_else(|| AppError::unauthorized("Missing bearer token"))?;

    let claims = state.services.auth().verify_token(token)?;

    request.extensions_mut().insert(CurrentUser {
        id: claims.sub,
        email: claims.email,
        role: claims.role,
        bar_id: claims.bar_id,
    });

    Ok(next.run(request).await)
}

/// Require admin role.
pub fn require_admin(user: &CurrentUser) -> Result<(), AppError> {
    if user.is_admin() {
        Ok(())
    } else {
        tracing::warn!(account_id = %user.id, role = %user.role, "Admin route refused");
        Err(AppError::unauthorized("Administrator role required"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role) -> CurrentUser {
        CurrentUser {
            id: Uuid::new_v4(),
            email: "someone@example.com".to_string(),
            role,
            bar_id: None,
        }
    }

    #[test]
    fn test_require_admin() {
        assert!(require_admin(&user(Role::Admin)).is_ok());
        assert!(matches!(
            require_admin(&user(Role::Customer)),
            Err(AppError::UnAuthorized(_))
        ));
    }

    #[test]
    fn test_caller_is_account_id() {
        let current = user(Role::Staff);
        assert!(current.caller().is(current.id));
    }
}
