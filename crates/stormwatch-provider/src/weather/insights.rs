//! Client for the AI recommendation server (`POST /extreme_weather`).

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use stormwatch_core::config::weather::WeatherConfig;
use stormwatch_core::error::{AppError, ErrorKind};
use stormwatch_core::result::AppResult;
use stormwatch_core::traits::RecommendationProvider;
use stormwatch_core::types::ForecastSample;

use crate::http;

#[derive(Debug, Clone)]
pub struct AiRecommendationClient {
    client: Client,
    endpoint: String,
}

impl AiRecommendationClient {
    pub fn new(config: &WeatherConfig) -> AppResult<Self> {
        Ok(Self {
            client: http::client(config.request_timeout_seconds, ErrorKind::Provider)?,
            endpoint: format!("{}/extreme_weather", config.ai_url.trim_end_matches('/')),
        })
    }
}

/// The server consumes forecast entries in the OpenWeatherMap `list` shape.
#[derive(Debug, Serialize)]
struct InsightRequest<'a> {
    forecast: Vec<serde_json::Value>,
    location: &'a str,
}

fn wire_entry(sample: &ForecastSample) -> serde_json::Value {
    json!({
        "dt": sample.timestamp.timestamp(),
        "dt_txt": sample.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
        "main": { "temp": sample.temperature, "humidity": sample.humidity },
        "wind": { "speed": sample.wind_speed },
        "rain": { "3h": sample.rain_3h },
        "weather": [{ "main": sample.condition.as_str() }],
    })
}

#[derive(Debug, Deserialize)]
struct InsightResponse {
    #[serde(default)]
    today: Option<TodayInsight>,
}

#[derive(Debug, Default, Deserialize)]
struct TodayInsight {
    #[serde(default)]
    recommendations: Vec<String>,
}

#[async_trait]
impl RecommendationProvider for AiRecommendationClient {
    async fn recommendations(
        &self,
        forecast: &[ForecastSample],
        location: &str,
    ) -> AppResult<Vec<String>> {
        let request = InsightRequest {
            forecast: forecast.iter().map(wire_entry).collect(),
            location,
        };
        debug!(location, samples = forecast.len(), "Requesting AI recommendations");

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Provider, "Recommendation request failed", e)
            })?;
        let response =
            http::ensure_success(response, "Recommendation server", ErrorKind::Provider).await?;
        let body: InsightResponse = response.json().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Provider,
                "Recommendation server returned malformed JSON",
                e,
            )
        })?;

        Ok(body.today.unwrap_or_default().recommendations)
    }
}
