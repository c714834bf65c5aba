//! Authentication handlers.

use axum::{extract::State, response::Json, routing::post, Router};
use domain::{AccountResponse, RegisterAccount};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::errors::AppResult;
use crate::services::{RegistrationResponse, TokenResponse};
use crate::types::Created;

/// Account registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "guest@example.com")]
    pub email: String,
    /// Minimum 8 characters
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[schema(example = "SecurePass123!", min_length = 8)]
    pub password: String,
    /// Must repeat `password`
    #[schema(example = "SecurePass123!")]
    pub confirm_password: String,
    #[validate(length(min = 1, message = "Full name is required"))]
    #[schema(example = "Linh Tran")]
    pub full_name: String,
    #[schema(example = "0900000000")]
    pub phone: Option<String>,
}

impl From<RegisterRequest> for RegisterAccount {
    fn from(request: RegisterRequest) -> Self {
        Self {
            email: request.email,
            password: request.password,
            confirm_password: request.confirm_password,
            full_name: request.full_name,
            phone: request.phone.filter(|p| !p.trim().is_empty()),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "guest@example.com")]
    pub email: String,
    #[schema(example = "SecurePass123!")]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct GoogleLoginRequest {
    /// ID token obtained from Google Sign-In
    #[validate(length(min = 1, message = "ID token is required"))]
    pub id_token: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct VerifyOtpRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "guest@example.com")]
    pub email: String,
    #[validate(length(min = 1, message = "Verification code is required"))]
    #[schema(example = "123456")]
    pub code: String,
}

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/google", post(login_with_google))
        .route("/verify-otp", post(verify_otp))
}

/// Register a customer account and e-mail its verification code
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account registered, awaiting OTP verification", body = RegistrationResponse),
        (status = 400, description = "Validation error or password mismatch"),
        (status = 404, description = "Customer role missing"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<Created<RegistrationResponse>> {
    let response = state.services.auth().register(payload.into()).await?;
    Ok(Created(response))
}

/// Login and get JWT token
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials or unverified account")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let token = state
        .services
        .auth()
        .login(payload.email, payload.password)
        .await?;

    Ok(Json(token))
}

/// Sign in with a Google ID token
#[utoipa::path(
    post,
    path = "/auth/google",
    tag = "Authentication",
    request_body = GoogleLoginRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 401, description = "Account not verified"),
        (status = 500, description = "Google token could not be verified")
    )
)]
pub async fn login_with_google(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<GoogleLoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let token = state
        .services
        .auth()
        .login_with_google(payload.id_token)
        .await?;

    Ok(Json(token))
}

/// Confirm the registration code and activate the account
#[utoipa::path(
    post,
    path = "/auth/verify-otp",
    tag = "Authentication",
    request_body = VerifyOtpRequest,
    responses(
        (status = 200, description = "Account activated", body = AccountResponse),
        (status = 400, description = "Invalid or expired code"),
        (status = 404, description = "Account not found")
    )
)]
pub async fn verify_otp(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<VerifyOtpRequest>,
) -> AppResult<Json<AccountResponse>> {
    let account = state
        .services
        .auth()
        .verify_otp(payload.email, payload.code)
        .await?;

    Ok(Json(account))
}
