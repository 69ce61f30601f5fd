//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Token signing and account verification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for JWT signing (HMAC-SHA256).
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Access token lifetime in hours.
    #[serde(default = "default_token_ttl")]
    pub token_ttl_hours: u64,
    /// How long a verification code stays valid, in minutes.
    #[serde(default = "default_otp_ttl")]
    pub otp_ttl_minutes: u64,
    /// Minimum password length accepted at registration.
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            token_ttl_hours: default_token_ttl(),
            otp_ttl_minutes: default_otp_ttl(),
            password_min_length: default_password_min(),
        }
    }
}

const DEFAULT_JWT_SECRET: &str = "CHANGE_ME_IN_PRODUCTION";

impl AuthConfig {
    /// Whether the signing secret was left at its placeholder value.
    pub fn uses_default_secret(&self) -> bool {
        self.jwt_secret == DEFAULT_JWT_SECRET
    }
}

fn default_jwt_secret() -> String {
    DEFAULT_JWT_SECRET.to_string()
}

fn default_token_ttl() -> u64 {
    24
}

fn default_otp_ttl() -> u64 {
    10
}

fn default_password_min() -> usize {
    6
}
