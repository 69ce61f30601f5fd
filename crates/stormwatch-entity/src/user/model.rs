//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use stormwatch_core::types::{Coordinates, UserId};

/// Label used wherever a user has no resolved place name.
pub const FALLBACK_PLACE: &str = "Your Location";

/// A verified account.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: UserId,
    pub name: String,
    /// Unique, used as the owner key of tasks, alerts and mail.
    pub email: String,
    pub phone: String,
    /// Argon2 password hash.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_verified: bool,
    pub location_lat: Option<f64>,
    pub location_lon: Option<f64>,
    pub place_name: Option<String>,
    pub location_updated_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Stored coordinates, if both components are present.
    pub fn coordinates(&self) -> Option<Coordinates> {
        match (self.location_lat, self.location_lon) {
            (Some(lat), Some(lon)) => Some(Coordinates::new(lat, lon)),
            _ => None,
        }
    }

    /// Place name for message text.
    pub fn place_label(&self) -> &str {
        self.place_name
            .as_deref()
            .filter(|p| !p.is_empty())
            .unwrap_or(FALLBACK_PLACE)
    }

    /// Replace the stored location.
    pub fn set_location(&mut self, location: &UserLocation) {
        self.location_lat = Some(location.coordinates.lat);
        self.location_lon = Some(location.coordinates.lon);
        self.place_name = Some(location.place_name.clone());
        self.location_updated_at = Some(location.last_updated);
    }

    /// Stored location as a value object.
    pub fn location(&self) -> Option<UserLocation> {
        let coordinates = self.coordinates()?;
        Some(UserLocation {
            coordinates,
            place_name: self.place_label().to_string(),
            last_updated: self.location_updated_at.unwrap_or(self.created_at),
        })
    }
}

/// A resolved last-known location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserLocation {
    pub coordinates: Coordinates,
    pub place_name: String,
    pub last_updated: DateTime<Utc>,
}

/// Data required to create a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub phone: String,
    /// Pre-hashed password.
    pub password_hash: String,
    pub is_verified: bool,
    pub location: Option<UserLocation>,
}

impl CreateUser {
    /// Materialize the row this request would insert.
    pub fn into_user(self, created_at: DateTime<Utc>) -> User {
        let mut user = User {
            id: UserId::new(),
            name: self.name,
            email: self.email,
            phone: self.phone,
            password_hash: self.password_hash,
            is_verified: self.is_verified,
            location_lat: None,
            location_lon: None,
            place_name: None,
            location_updated_at: None,
            created_at,
        };
        if let Some(location) = &self.location {
            user.set_location(location);
        }
        user
    }
}
