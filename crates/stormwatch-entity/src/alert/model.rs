//! Alert entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use stormwatch_core::types::AlertId;

use super::category::AlertCategory;
use super::severity::Severity;

/// A hazard warning queued for delivery to one user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Alert {
    pub id: AlertId,
    /// Owner email. Not enforced as a foreign key.
    pub user_email: String,
    pub category: AlertCategory,
    pub title: String,
    pub severity: Severity,
    /// Human-readable place label.
    pub location: String,
    pub description: String,
    /// Where the alert came from (e.g. `"OpenWeatherMap"`).
    pub source: String,
    /// Flipped once by the delivery dispatcher.
    pub delivered: bool,
    pub created_at: DateTime<Utc>,
    /// Instant from which the alert is eligible for delivery.
    pub trigger_time: Option<DateTime<Utc>>,
}

impl Alert {
    /// Whether a dispatcher tick at `now` should pick this alert up.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        !self.delivered && self.trigger_time.is_some_and(|t| t <= now)
    }

    /// First line of the description, used as the SMS teaser.
    pub fn headline(&self) -> &str {
        self.description
            .lines()
            .find(|l| !l.trim().is_empty())
            .unwrap_or("")
            .trim()
    }
}

/// Data required to create a pending alert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAlert {
    pub user_email: String,
    pub category: AlertCategory,
    pub title: String,
    pub severity: Severity,
    pub location: String,
    pub description: String,
    pub source: String,
    pub trigger_time: Option<DateTime<Utc>>,
}

impl CreateAlert {
    pub fn into_alert(self, created_at: DateTime<Utc>) -> Alert {
        Alert {
            id: AlertId::new(),
            user_email: self.user_email,
            category: self.category,
            title: self.title,
            severity: self.severity,
            location: self.location,
            description: self.description,
            source: self.source,
            delivered: false,
            created_at,
            trigger_time: self.trigger_time,
        }
    }
}
