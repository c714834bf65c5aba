//! One-time passwords for e-mail verification.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use rand::Rng;

use crate::config::{MAX_OTP_ATTEMPTS, OTP_LENGTH};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait OtpIssuer: Send + Sync {
    /// Issue a fresh code for `email`, replacing any pending one.
    fn issue(&self, email: &str) -> String;

    /// Check and consume the pending code. Expired codes never verify, and
    /// a code is discarded after too many wrong guesses.
    fn verify(&self, email: &str, code: &str) -> bool;
}

struct PendingOtp {
    code: String,
    expires_at: DateTime<Utc>,
    failed_attempts: u32,
}

/// Process-local OTP store.
pub struct InMemoryOtpStore {
    codes: DashMap<String, PendingOtp>,
    ttl: Duration,
}

impl InMemoryOtpStore {
    pub fn new(ttl_minutes: i64) -> Self {
        Self {
            codes: DashMap::new(),
            ttl: Duration::minutes(ttl_minutes),
        }
    }

    /// Drop codes that can no longer verify.
    fn sweep_expired(&self, now: DateTime<Utc>) {
        self.codes.retain(|_, pending| pending.expires_at > now);
    }

    fn generate() -> String {
        let mut rng = rand::rng();
        (0..OTP_LENGTH)
            .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
            .collect()
    }
}

impl OtpIssuer for InMemoryOtpStore {
    fn issue(&self, email: &str) -> String {
        let now = Utc::now();
        self.sweep_expired(now);

        let code = Self::generate();
        self.codes.insert(
            email.to_lowercase(),
            PendingOtp {
                code: code.clone(),
                expires_at: now + self.ttl,
                failed_attempts: 0,
            },
        );
        code
    }

    fn verify(&self, email: &str, code: &str) -> bool {
        let key = email.to_lowercase();
        let Some((_, mut pending)) = self.codes.remove(&key) else {
            return false;
        };
        if pending.expires_at <= Utc::now() {
            tracing::debug!(email = %key, "OTP expired");
            return false;
        }
        if pending.code == code.trim() {
            return true;
        }

        pending.failed_attempts += 1;
        if pending.failed_attempts >= MAX_OTP_ATTEMPTS {
            tracing::warn!(email = %key, "OTP discarded after repeated wrong codes");
            return false;
        }
        self.codes.insert(key, pending);
        false
    }
}
