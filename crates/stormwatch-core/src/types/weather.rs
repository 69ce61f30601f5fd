//! Normalized weather records returned by weather providers.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Condition group reported by the provider (`weather[0].main`).
///
/// Labels outside the known set are kept verbatim in [`WeatherCondition::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WeatherCondition {
    Clear,
    Clouds,
    Rain,
    Drizzle,
    Thunderstorm,
    Snow,
    Mist,
    Fog,
    Other(String),
}

impl WeatherCondition {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Clear => "Clear",
            Self::Clouds => "Clouds",
            Self::Rain => "Rain",
            Self::Drizzle => "Drizzle",
            Self::Thunderstorm => "Thunderstorm",
            Self::Snow => "Snow",
            Self::Mist => "Mist",
            Self::Fog => "Fog",
            Self::Other(label) => label,
        }
    }
}

impl From<&str> for WeatherCondition {
    fn from(label: &str) -> Self {
        match label {
            "Clear" => Self::Clear,
            "Clouds" => Self::Clouds,
            "Rain" => Self::Rain,
            "Drizzle" => Self::Drizzle,
            "Thunderstorm" => Self::Thunderstorm,
            "Snow" => Self::Snow,
            "Mist" => Self::Mist,
            "Fog" => Self::Fog,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for WeatherCondition {
    fn from(label: String) -> Self {
        Self::from(label.as_str())
    }
}

impl From<WeatherCondition> for String {
    fn from(condition: WeatherCondition) -> Self {
        condition.as_str().to_string()
    }
}

impl Default for WeatherCondition {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One point of the 3-hour forecast series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSample {
    /// Instant the sample describes.
    pub timestamp: DateTime<Utc>,
    /// Temperature in °C.
    pub temperature: f64,
    /// Relative humidity in percent.
    pub humidity: f64,
    /// Wind speed as reported by the provider.
    pub wind_speed: f64,
    /// Rain volume over the 3-hour window in mm.
    pub rain_3h: f64,
    pub condition: WeatherCondition,
}

/// Current conditions at a location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub condition: WeatherCondition,
    pub temperature: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    /// Rain volume over the last hour in mm.
    pub rainfall_1h: f64,
    pub visibility_km: f64,
    /// Station name reported by the provider, if any.
    pub place_name: Option<String>,
}

/// Air-quality index on the provider's 1..=5 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AirQuality {
    pub aqi: u8,
}

impl AirQuality {
    const LEVELS: [&'static str; 5] = ["Good", "Fair", "Moderate", "Poor", "Very Poor"];

    /// Human-readable level, `"Unknown"` outside the 1..=5 scale.
    pub fn label(&self) -> &'static str {
        usize::from(self.aqi)
            .checked_sub(1)
            .and_then(|i| Self::LEVELS.get(i))
            .copied()
            .unwrap_or("Unknown")
    }
}
