//! Request context carrying the authenticated caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stormwatch_core::error::AppError;

/// Context for the current authenticated request.
///
/// Built by the API from a verified bearer token and passed into service
/// methods, so every operation knows who is acting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The caller's account email (token subject).
    pub email: String,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    pub fn new(email: impl Into<String>, request_time: DateTime<Utc>) -> Self {
        Self {
            email: email.into(),
            request_time,
        }
    }

    /// Whether `email` names the caller (case-insensitive).
    pub fn is(&self, email: &str) -> bool {
        self.email.eq_ignore_ascii_case(email.trim())
    }

    /// Fail with `Authorization` unless `owner` is the caller.
    pub fn ensure_owner(&self, owner: &str) -> Result<(), AppError> {
        if self.is(owner) {
            Ok(())
        } else {
            Err(AppError::authorization(
                "You can only access your own resources",
            ))
        }
    }
}
