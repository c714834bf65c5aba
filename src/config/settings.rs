//! Application settings loaded from environment variables.

use std::env;

use common::{
    DatabaseConfig, GoogleConfig, JwtConfig, MailConfig, OtpConfig, PushConfig, ServerConfig,
};

use super::constants::{
    DEFAULT_DATABASE_URL, DEFAULT_JWT_EXPIRATION_HOURS, DEFAULT_OTP_TTL_MINUTES,
    DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT, MIN_JWT_SECRET_LENGTH,
};

/// Application configuration, composed of the shared config sections.
#[derive(Clone, Default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub server: ServerConfig,
    pub push: PushConfig,
    pub mail: MailConfig,
    pub otp: OtpConfig,
    pub google: GoogleConfig,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_expiration_hours", &self.jwt.expiration_hours)
            .field("server", &self.server)
            .field(
                "fcm_server_key",
                &self.push.fcm_server_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("mail_from", &self.mail.from)
            .field("otp_ttl_minutes", &self.otp.ttl_minutes)
            .field("google_client_id", &self.google.client_id)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Panics
    /// Panics if JWT_SECRET is not set in a release build or is too short.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            if cfg!(debug_assertions) {
                tracing::warn!("JWT_SECRET not set, using insecure default for development");
                "dev-secret-key-minimum-32-chars!!".to_string()
            } else {
                panic!("JWT_SECRET environment variable must be set in production");
            }
        });

        if jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            panic!(
                "JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LENGTH
            );
        }

        let mut config = Self::default();

        config.database.url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
        config.jwt = JwtConfig {
            secret: jwt_secret,
            expiration_hours: parse_var("JWT_EXPIRATION_HOURS")
                .unwrap_or(DEFAULT_JWT_EXPIRATION_HOURS),
        };
        config.server = ServerConfig {
            host: env::var("SERVER_HOST").unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            port: parse_var("SERVER_PORT").unwrap_or(DEFAULT_SERVER_PORT),
        };
        config.push.fcm_server_key = non_empty_var("FCM_SERVER_KEY");
        if let Some(from) = non_empty_var("MAIL_FROM") {
            config.mail.from = from;
        }
        config.otp.ttl_minutes = parse_var("OTP_TTL_MINUTES").unwrap_or(DEFAULT_OTP_TTL_MINUTES);
        config.google.client_id = non_empty_var("GOOGLE_CLIENT_ID");

        config
    }

    /// Get JWT secret bytes for token signing/verification.
    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt.secret.as_bytes()
    }
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
