//! Google ID token verification via the tokeninfo endpoint.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::config::Config;
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

const DEFAULT_TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";

/// Identity asserted by a verified Google ID token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoogleIdentity {
    pub email: String,
    pub name: Option<String>,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait GoogleTokenVerifier: Send + Sync {
    async fn verify(&self, id_token: &str) -> AppResult<GoogleIdentity>;
}

#[derive(Debug, Deserialize)]
struct TokenInfo {
    aud: Option<String>,
    email: Option<String>,
    /// Google returns this as either a JSON bool or the string "true"
    email_verified: Option<Value>,
    name: Option<String>,
}

impl TokenInfo {
    fn email_verified(&self) -> bool {
        match &self.email_verified {
            Some(Value::Bool(verified)) => *verified,
            Some(Value::String(verified)) => verified == "true",
            _ => false,
        }
    }

    fn into_identity(self, client_id: Option<&str>) -> AppResult<GoogleIdentity> {
        if let Some(expected) = client_id {
            if self.aud.as_deref() != Some(expected) {
                return Err(AppError::unauthorized("Google token issued for another client"));
            }
        }
        if !self.email_verified() {
            return Err(AppError::unauthorized("Google account e-mail is not verified"));
        }
        let email = self
            .email
            .ok_or_else(|| AppError::unauthorized("Google token carries no e-mail"))?;

        Ok(GoogleIdentity {
            email: email.to_lowercase(),
            name: self.name,
        })
    }
}

pub struct GoogleTokenInfoVerifier {
    client: reqwest::Client,
    tokeninfo_url: String,
    client_id: Option<String>,
}

impl GoogleTokenInfoVerifier {
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            tokeninfo_url: config
                .google
                .tokeninfo_url
                .clone()
                .unwrap_or_else(|| DEFAULT_TOKENINFO_URL.to_string()),
            client_id: config.google.client_id.clone(),
        }
    }
}

#[async_trait]
impl GoogleTokenVerifier for GoogleTokenInfoVerifier {
    async fn verify(&self, id_token: &str) -> AppResult<GoogleIdentity> {
        let response = self
            .client
            .get(&self.tokeninfo_url)
            .query(&[("id_token", id_token)])
            .send()
            .await
            .map_err(|e| AppError::internal(format!("Google tokeninfo request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::unauthorized("Invalid Google ID token"));
        }

        let info: TokenInfo = response
            .json()
            .await
            .map_err(|e| AppError::internal(format!("Malformed tokeninfo response: {}", e)))?;

        info.into_identity(self.client_id.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(aud: &str, verified: Value) -> TokenInfo {
        TokenInfo {
            aud: Some(aud.to_string()),
            email: Some("Guest@Example.com".to_string()),
            email_verified: Some(verified),
            name: Some("Guest".to_string()),
        }
    }

    #[test]
    fn test_verified_token_yields_identity() {
        let identity = info("client-1", Value::String("true".to_string()))
            .into_identity(Some("client-1"))
            .unwrap();
        assert_eq!(identity.email, "guest@example.com");
        assert_eq!(identity.name.as_deref(), Some("Guest"));
    }

    #[test]
    fn test_audience_mismatch_rejected() {
        let result = info("client-2", Value::Bool(true)).into_identity(Some("client-1"));
        assert!(matches!(result, Err(AppError::UnAuthorized(_))));
    }

    #[test]
    fn test_unverified_email_rejected() {
        let result = info("client-1", Value::Bool(false)).into_identity(None);
        assert!(matches!(result, Err(AppError::UnAuthorized(_))));
    }
}
