//! Weather provider configuration.

use serde::{Deserialize, Serialize};

use crate::types::geo::Coordinates;

/// OpenWeatherMap and recommendation-server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// OpenWeatherMap API key (`appid`).
    #[serde(default)]
    pub api_key: String,
    /// Base URL for the `data/2.5` endpoints.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Base URL for the `geo/1.0` endpoints.
    #[serde(default = "default_geo_url")]
    pub geo_url: String,
    /// Base URL of the AI recommendation server.
    #[serde(default = "default_ai_url")]
    pub ai_url: String,
    /// Coordinates used when a user has no stored location.
    #[serde(default = "default_location")]
    pub default_location: Coordinates,
    /// Outbound HTTP timeout in seconds.
    #[serde(default = "default_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            geo_url: default_geo_url(),
            ai_url: default_ai_url(),
            default_location: default_location(),
            request_timeout_seconds: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

fn default_geo_url() -> String {
    "https://api.openweathermap.org/geo/1.0".to_string()
}

fn default_ai_url() -> String {
    "http://localhost:5001".to_string()
}

fn default_location() -> Coordinates {
    Coordinates::DEFAULT_LOCATION
}

fn default_timeout() -> u64 {
    30
}
