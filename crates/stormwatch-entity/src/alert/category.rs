//! Alert category enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Hazard family an alert belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "alert_category", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AlertCategory {
    Weather,
    Flood,
    Earthquake,
    Cyclone,
    Other,
}

impl AlertCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weather => "weather",
            Self::Flood => "flood",
            Self::Earthquake => "earthquake",
            Self::Cyclone => "cyclone",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for AlertCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AlertCategory {
    type Err = stormwatch_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "weather" => Ok(Self::Weather),
            "flood" => Ok(Self::Flood),
            "earthquake" => Ok(Self::Earthquake),
            "cyclone" => Ok(Self::Cyclone),
            "other" => Ok(Self::Other),
            _ => Err(stormwatch_core::AppError::validation(format!(
                "Invalid notification type: '{s}'. Expected one of: weather, flood, earthquake, cyclone, other"
            ))),
        }
    }
}
