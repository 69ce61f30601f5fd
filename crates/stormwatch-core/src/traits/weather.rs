//! Weather and recommendation provider traits.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::{AirQuality, Coordinates, CurrentConditions, ForecastSample};

/// Source of forecasts, current conditions, air quality and place names.
#[async_trait]
pub trait WeatherProvider: Send + Sync + std::fmt::Debug + 'static {
    /// 3-hour resolution forecast series, oldest first.
    async fn forecast(&self, at: Coordinates) -> AppResult<Vec<ForecastSample>>;

    /// Conditions observed now.
    async fn current(&self, at: Coordinates) -> AppResult<CurrentConditions>;

    /// Current air-quality index.
    async fn air_quality(&self, at: Coordinates) -> AppResult<AirQuality>;

    /// Nearest place name, `None` when the provider knows none.
    async fn reverse_geocode(&self, at: Coordinates) -> AppResult<Option<String>>;
}

/// Source of free-text advice derived from a forecast.
#[async_trait]
pub trait RecommendationProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Today's recommendations for `location`, in display order.
    async fn recommendations(
        &self,
        forecast: &[ForecastSample],
        location: &str,
    ) -> AppResult<Vec<String>>;
}
