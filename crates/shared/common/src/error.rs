//! Unified error handling.
//!
//! One error type classifies every failure the services can report and
//! renders it as an HTTP response for the API layer.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::DomainError;
use serde::Serialize;
use thiserror::Error;

/// Application error kinds.
#[derive(Error, Debug)]
pub enum AppError {
    /// Malformed input or a value failing a business rule
    #[error("{0}")]
    InvalidData(String),

    /// Uniqueness violation on create or update
    #[error("{0} already exists")]
    DataExists(String),

    /// No matching record, or a lookup entity is absent
    #[error("{0} not found")]
    DataNotFound(String),

    /// Missing identity, bad credentials, or a scope the caller does not own
    #[error("{0}")]
    UnAuthorized(String),

    /// A downstream collaborator failed on a critical path
    #[error("Internal server error")]
    InternalServerError(String),
}

/// Error response body for HTTP
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
}

impl AppError {
    /// Get error code for client
    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidData(_) => "INVALID_DATA",
            AppError::DataExists(_) => "DATA_EXISTS",
            AppError::DataNotFound(_) => "DATA_NOT_FOUND",
            AppError::UnAuthorized(_) => "UNAUTHORIZED",
            AppError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    /// Get HTTP status code
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidData(_) => StatusCode::BAD_REQUEST,
            AppError::DataExists(_) => StatusCode::CONFLICT,
            AppError::DataNotFound(_) => StatusCode::NOT_FOUND,
            AppError::UnAuthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Inner message, including internal details. For logs only.
    pub fn detail(&self) -> &str {
        match self {
            AppError::InvalidData(msg)
            | AppError::DataExists(msg)
            | AppError::DataNotFound(msg)
            | AppError::UnAuthorized(msg)
            | AppError::InternalServerError(msg) => msg,
        }
    }

    /// Get user-facing message (hides internal details)
    pub fn user_message(&self) -> String {
        match self {
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code().to_string(),
                message: self.user_message(),
            },
        };

        (status, Json(body)).into_response()
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidData(msg) => AppError::InvalidData(msg),
            DomainError::Password(msg) => AppError::InvalidData(msg),
            DomainError::NotFound(entity) => AppError::DataNotFound(entity),
            DomainError::Exists(entity) => AppError::DataExists(entity),
            DomainError::Unauthorized(msg) => AppError::UnAuthorized(msg),
            DomainError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

#[cfg(feature = "database")]
impl From<sea_orm::DbErr> for AppError {
    fn from(err: sea_orm::DbErr) -> Self {
        AppError::InternalServerError(format!("Database error: {}", err))
    }
}

#[cfg(feature = "jwt")]
impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        tracing::debug!("JWT rejected: {:?}", err);
        AppError::UnAuthorized("Invalid or expired token".to_string())
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for Option -> AppError conversion
pub trait OptionExt<T> {
    fn ok_or_not_found(self, entity: &str) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self, entity: &str) -> AppResult<T> {
        self.ok_or_else(|| AppError::not_found(entity))
    }
}

/// Convenience constructors
impl AppError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        AppError::InvalidData(msg.into())
    }

    pub fn exists(entity: impl Into<String>) -> Self {
        AppError::DataExists(entity.into())
    }

    pub fn not_found(entity: impl Into<String>) -> Self {
        AppError::DataNotFound(entity.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        AppError::UnAuthorized(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::InternalServerError(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::invalid("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::exists("Category").status(), StatusCode::CONFLICT);
        assert_eq!(AppError::not_found("Account").status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::unauthorized("no").status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::internal("boom").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_details_are_hidden() {
        let err = AppError::internal("connection reset by peer");
        assert_eq!(err.user_message(), "An internal error occurred");
    }

    #[test]
    fn test_messages() {
        assert_eq!(AppError::exists("Email").to_string(), "Email already exists");
        assert_eq!(AppError::not_found("Role").to_string(), "Role not found");
    }

    #[test]
    fn test_domain_error_conversion() {
        assert!(matches!(
            AppError::from(DomainError::invalid("bad")),
            AppError::InvalidData(_)
        ));
        assert!(matches!(
            AppError::from(DomainError::password("short")),
            AppError::InvalidData(_)
        ));
        assert!(matches!(
            AppError::from(DomainError::not_found("Bar")),
            AppError::DataNotFound(_)
        ));
    }

    #[test]
    fn test_option_ext() {
        let missing: Option<u8> = None;
        assert!(matches!(
            missing.ok_or_not_found("Category"),
            Err(AppError::DataNotFound(entity)) if entity == "Category"
        ));
    }
}
