//! Authentication service - registration, sign-in and token handling.
//!
//! Registration leaves the account inactive until the e-mailed OTP is
//! confirmed. Google sign-in trusts the verified Google e-mail and creates
//! an active customer account on first use.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use domain::{Account, AccountResponse, Password, RegisterAccount, Role};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use super::access;
use crate::config::{Config, OTP_EMAIL_SUBJECT, SECONDS_PER_HOUR, TOKEN_TYPE_BEARER};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{EmailSender, GoogleTokenVerifier, OtpIssuer, UnitOfWork};

/// JWT claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub role: Role,
    /// Bar the account works for, staff only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bar_id: Option<Uuid>,
    pub exp: i64,
    pub iat: i64,
}

/// Token response returned after successful authentication
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    /// JWT access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    /// Token type (always "Bearer")
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Token expiration time in seconds
    #[schema(example = 86400)]
    pub expires_in: i64,
}

/// Result of a registration.
#[derive(Debug, Serialize, ToSchema)]
pub struct RegistrationResponse {
    pub account: AccountResponse,
    /// False when the verification e-mail could not be queued
    pub otp_sent: bool,
}

#[async_trait]
pub trait AuthService: Send + Sync {
    async fn register(&self, request: RegisterAccount) -> AppResult<RegistrationResponse>;

    async fn login(&self, email: String, password: String) -> AppResult<TokenResponse>;

    async fn login_with_google(&self, id_token: String) -> AppResult<TokenResponse>;

    /// Confirm the registration OTP and activate the account.
    async fn verify_otp(&self, email: String, code: String) -> AppResult<AccountResponse>;

    /// Verify JWT token and extract claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;
}

fn generate_token(account: &Account, config: &Config) -> AppResult<TokenResponse> {
    let now = Utc::now();
    let expires_at = now + Duration::hours(config.jwt.expiration_hours);

    let claims = Claims {
        sub: account.id,
        email: account.email.clone(),
        role: account.role,
        bar_id: account.bar_id,
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )?;

    Ok(TokenResponse {
        access_token: token,
        token_type: TOKEN_TYPE_BEARER.to_string(),
        expires_in: config.jwt.expiration_hours * SECONDS_PER_HOUR,
    })
}

fn verify_token_internal(token: &str, config: &Config) -> AppResult<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    config: Config,
    otp: Arc<dyn OtpIssuer>,
    mailer: Arc<dyn EmailSender>,
    google: Arc<dyn GoogleTokenVerifier>,
}

impl<U: UnitOfWork> Authenticator<U> {
    pub fn new(
        uow: Arc<U>,
        config: Config,
        otp: Arc<dyn OtpIssuer>,
        mailer: Arc<dyn EmailSender>,
        google: Arc<dyn GoogleTokenVerifier>,
    ) -> Self {
        Self {
            uow,
            config,
            otp,
            mailer,
            google,
        }
    }

    /// Store the account, then issue and mail its OTP. Runs inside the
    /// registration transaction.
    async fn store_registration(
        &self,
        existing: Option<Account>,
        account: Account,
    ) -> AppResult<RegistrationResponse> {
        let stored = match existing {
            Some(_) => self.uow.accounts().update(&account).await?,
            None => self.uow.accounts().insert(&account).await?,
        };
        self.uow.save().await?;

        let code = self.otp.issue(&stored.email);
        let body = format!(
            "Your verification code is {}. It expires in {} minutes.",
            code, self.config.otp.ttl_minutes
        );
        let otp_sent = match self.mailer.send(&stored.email, OTP_EMAIL_SUBJECT, &body).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(account_id = %stored.id, error = %e.detail(), "OTP e-mail not queued");
                false
            }
        };

        Ok(RegistrationResponse {
            account: AccountResponse::from(stored),
            otp_sent,
        })
    }

    async fn rollback_quietly(&self) {
        if let Err(e) = self.uow.rollback_transaction().await {
            tracing::warn!(error = %e.detail(), "Rollback failed");
        }
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn register(&self, request: RegisterAccount) -> AppResult<RegistrationResponse> {
        request.ensure_passwords_match()?;
        let password = Password::new(&request.password)?;
        let email = normalize_email(&request.email);

        let existing = self.uow.accounts().find_by_email(&email).await?;
        if existing.as_ref().is_some_and(|a| a.is_active) {
            return Err(AppError::exists("Email"));
        }
        let role = access::customer_role(self.uow.as_ref()).await?;

        let account = match existing.clone() {
            Some(mut pending) => {
                pending.refresh_registration(
                    password.into_string(),
                    request.full_name,
                    request.phone,
                );
                pending
            }
            None => Account::new(
                email,
                password.into_string(),
                request.full_name,
                request.phone,
                role.id,
                role.role,
            ),
        };

        self.uow.begin_transaction().await?;
        match self.store_registration(existing, account).await {
            Ok(response) => {
                self.uow.commit_transaction().await?;
                tracing::info!(account_id = %response.account.id, "Account registered");
                Ok(response)
            }
            Err(e) => {
                self.rollback_quietly().await;
                Err(e)
            }
        }
    }

    async fn login(&self, email: String, password: String) -> AppResult<TokenResponse> {
        let account = self
            .uow
            .accounts()
            .find_by_email(&normalize_email(&email))
            .await?;

        // Verify even when the account is missing so response time does not
        // reveal which e-mails are registered.
        let stored_hash = account.as_ref().map(|a| a.password_hash.as_str());
        let password_valid = Password::verify_stored(stored_hash, &password);

        let account = match account {
            Some(account) if password_valid => account,
            _ => return Err(AppError::unauthorized("Invalid email or password")),
        };
        if !account.is_active {
            return Err(AppError::unauthorized("Account has not been verified"));
        }

        generate_token(&account, &self.config)
    }

    async fn login_with_google(&self, id_token: String) -> AppResult<TokenResponse> {
        let identity = self.google.verify(&id_token).await.map_err(|e| {
            tracing::warn!(error = %e.detail(), "Google token verification failed");
            AppError::internal(format!("Google sign-in failed: {}", e.detail()))
        })?;

        if let Some(account) = self.uow.accounts().find_by_email(&identity.email).await? {
            if !account.is_active {
                return Err(AppError::unauthorized("Account has not been verified"));
            }
            return generate_token(&account, &self.config);
        }

        let role = access::customer_role(self.uow.as_ref()).await?;
        let full_name = identity.name.unwrap_or_else(|| identity.email.clone());
        let mut account = Account::new(
            identity.email,
            Password::random()?.into_string(),
            full_name,
            None,
            role.id,
            role.role,
        );
        account.activate();

        let created = self.uow.accounts().insert(&account).await?;
        self.uow.save().await?;
        tracing::info!(account_id = %created.id, "Account created from Google sign-in");

        generate_token(&created, &self.config)
    }

    async fn verify_otp(&self, email: String, code: String) -> AppResult<AccountResponse> {
        let email = normalize_email(&email);
        if !self.otp.verify(&email, code.trim()) {
            return Err(AppError::invalid("Invalid or expired verification code"));
        }

        let mut account = self
            .uow
            .accounts()
            .find_by_email(&email)
            .await?
            .ok_or_not_found("Account")?;
        account.activate();

        let updated = self.uow.accounts().update(&account).await?;
        self.uow.save().await?;

        tracing::info!(account_id = %updated.id, "Account activated");
        Ok(AccountResponse::from(updated))
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        verify_token_internal(token, &self.config)
    }
}
