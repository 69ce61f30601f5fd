//! Registrations awaiting verification-code confirmation.
//!
//! Entries live in a `moka` cache keyed by lowercase email and expire after
//! the configured code TTL. The code never leaves the server except through
//! the email and SMS channels.

use std::time::Duration;

use moka::future::Cache;
use serde::{Deserialize, Serialize};

use stormwatch_core::config::auth::AuthConfig;
use stormwatch_entity::user::{CreateUser, UserLocation};

/// A registration that has not been confirmed yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingRegistration {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password_hash: String,
    pub location: Option<UserLocation>,
    pub code: String,
}

impl PendingRegistration {
    pub fn code_matches(&self, candidate: &str) -> bool {
        let candidate = candidate.trim();
        candidate.len() == self.code.len()
            && candidate
                .bytes()
                .zip(self.code.bytes())
                .fold(0u8, |acc, (a, b)| acc | (a ^ b))
                == 0
    }

    /// The verified account this registration turns into.
    pub fn into_create_user(self) -> CreateUser {
        CreateUser {
            name: self.name,
            email: self.email,
            phone: self.phone,
            password_hash: self.password_hash,
            is_verified: true,
            location: self.location,
        }
    }
}

/// TTL-bounded store of pending registrations.
#[derive(Debug, Clone)]
pub struct PendingRegistrations {
    cache: Cache<String, PendingRegistration>,
}

impl PendingRegistrations {
    pub fn new(config: &AuthConfig) -> Self {
        Self::with_ttl(Duration::from_secs(config.otp_ttl_minutes * 60))
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            cache: Cache::builder()
                .max_capacity(100_000)
                .time_to_live(ttl)
                .build(),
        }
    }

    fn key(email: &str) -> String {
        email.trim().to_lowercase()
    }

    /// Store or replace the pending entry for its email.
    pub async fn put(&self, pending: PendingRegistration) {
        self.cache.insert(Self::key(&pending.email), pending).await;
    }

    pub async fn get(&self, email: &str) -> Option<PendingRegistration> {
        self.cache.get(&Self::key(email)).await
    }

    pub async fn remove(&self, email: &str) {
        self.cache.invalidate(&Self::key(email)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending(email: &str, code: &str) -> PendingRegistration {
        PendingRegistration {
            name: "Kiran".into(),
            email: email.into(),
            phone: "9000000000".into(),
            password_hash: "hash".into(),
            location: None,
            code: code.into(),
        }
    }

    #[tokio::test]
    async fn test_lookup_is_case_insensitive() {
        let store = PendingRegistrations::with_ttl(Duration::from_secs(60));
        store.put(pending("Kiran@Example.com", "123456")).await;
        assert!(store.get("kiran@example.com").await.is_some());

        store.remove("KIRAN@example.com").await;
        assert!(store.get("kiran@example.com").await.is_none());
    }

    #[tokio::test]
    async fn test_entries_expire() {
        let store = PendingRegistrations::with_ttl(Duration::from_millis(50));
        store.put(pending("a@example.com", "123456")).await;
        tokio::time::sleep(Duration::from_millis(120)).await;
        assert!(store.get("a@example.com").await.is_none());
    }

    #[test]
    fn test_code_matches() {
        let p = pending("a@example.com", "482913");
        assert!(p.code_matches("482913"));
        assert!(p.code_matches(" 482913 "));
        assert!(!p.code_matches("482914"));
        assert!(!p.code_matches("48291"));
    }

    #[test]
    fn test_into_create_user_is_verified() {
        let user = pending("a@example.com", "1").into_create_user();
        assert!(user.is_verified);
        assert_eq!(user.email, "a@example.com");
    }
}
