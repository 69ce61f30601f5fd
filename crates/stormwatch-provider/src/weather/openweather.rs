//! OpenWeatherMap client (`data/2.5` and `geo/1.0`).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use stormwatch_core::config::weather::WeatherConfig;
use stormwatch_core::error::{AppError, ErrorKind};
use stormwatch_core::result::AppResult;
use stormwatch_core::traits::WeatherProvider;
use stormwatch_core::types::{
    AirQuality, Coordinates, CurrentConditions, ForecastSample, WeatherCondition,
};

use crate::http;

/// HTTP client for the OpenWeatherMap API, always in metric units.
#[derive(Clone)]
pub struct OpenWeatherClient {
    client: Client,
    api_key: String,
    base_url: String,
    geo_url: String,
}

impl std::fmt::Debug for OpenWeatherClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenWeatherClient")
            .field("base_url", &self.base_url)
            .field("geo_url", &self.geo_url)
            .finish_non_exhaustive()
    }
}

impl OpenWeatherClient {
    pub fn new(config: &WeatherConfig) -> AppResult<Self> {
        Ok(Self {
            client: http::client(config.request_timeout_seconds, ErrorKind::Provider)?,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            geo_url: config.geo_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, base: &str, endpoint: &str, at: Coordinates, extra: &[(&str, &str)]) -> AppResult<Url> {
        let lat = at.lat.to_string();
        let lon = at.lon.to_string();
        let mut params = vec![
            ("lat", lat.as_str()),
            ("lon", lon.as_str()),
            ("appid", self.api_key.as_str()),
        ];
        params.extend_from_slice(extra);
        Url::parse_with_params(&format!("{base}/{endpoint}"), &params).map_err(|e| {
            AppError::with_source(ErrorKind::Configuration, "Invalid weather API URL", e)
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, what: &str) -> AppResult<T> {
        debug!(endpoint = %url.path(), "Calling OpenWeatherMap");
        let response = self.client.get(url).send().await.map_err(|e| {
            AppError::with_source(ErrorKind::Provider, format!("{what} request failed"), e)
        })?;
        let response = http::ensure_success(response, what, ErrorKind::Provider).await?;
        response.json::<T>().await.map_err(|e| {
            AppError::with_source(ErrorKind::Provider, format!("{what} returned malformed JSON"), e)
        })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    async fn forecast(&self, at: Coordinates) -> AppResult<Vec<ForecastSample>> {
        let url = self.url(&self.base_url, "forecast", at, &[("units", "metric")])?;
        let body: ForecastResponse = self.get_json(url, "Forecast").await?;
        Ok(body.list.into_iter().filter_map(ForecastEntry::into_sample).collect())
    }

    async fn current(&self, at: Coordinates) -> AppResult<CurrentConditions> {
        let url = self.url(&self.base_url, "weather", at, &[("units", "metric")])?;
        let body: CurrentResponse = self.get_json(url, "Current weather").await?;
        Ok(body.into_conditions())
    }

    async fn air_quality(&self, at: Coordinates) -> AppResult<AirQuality> {
        let url = self.url(&self.base_url, "air_pollution", at, &[])?;
        let body: AirPollutionResponse = self.get_json(url, "Air pollution").await?;
        let aqi = body.list.first().map(|e| e.main.aqi).unwrap_or(0);
        Ok(AirQuality { aqi })
    }

    async fn reverse_geocode(&self, at: Coordinates) -> AppResult<Option<String>> {
        let url = self.url(&self.geo_url, "reverse", at, &[("limit", "1")])?;
        let places: Vec<GeoPlace> = self.get_json(url, "Reverse geocoding").await?;
        Ok(places
            .into_iter()
            .next()
            .map(|p| p.name)
            .filter(|name| !name.trim().is_empty()))
    }
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    list: Vec<ForecastEntry>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MainBlock {
    temp: f64,
    humidity: f64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WindBlock {
    speed: f64,
}

#[derive(Debug, Default, Deserialize)]
struct RainBlock {
    #[serde(rename = "1h", default)]
    one_hour: f64,
    #[serde(rename = "3h", default)]
    three_hours: f64,
}

#[derive(Debug, Deserialize)]
struct ConditionBlock {
    main: String,
}

fn first_condition(blocks: Vec<ConditionBlock>) -> WeatherCondition {
    blocks
        .into_iter()
        .next()
        .map(|b| WeatherCondition::from(b.main))
        .unwrap_or_default()
}

#[derive(Debug, Deserialize)]
struct ForecastEntry {
    dt: i64,
    #[serde(default)]
    main: MainBlock,
    #[serde(default)]
    wind: WindBlock,
    #[serde(default)]
    rain: Option<RainBlock>,
    #[serde(default)]
    weather: Vec<ConditionBlock>,
}

impl ForecastEntry {
    fn into_sample(self) -> Option<ForecastSample> {
        let timestamp = DateTime::<Utc>::from_timestamp(self.dt, 0)?;
        Some(ForecastSample {
            timestamp,
            temperature: self.main.temp,
            humidity: self.main.humidity,
            wind_speed: self.wind.speed,
            rain_3h: self.rain.map(|r| r.three_hours).unwrap_or(0.0),
            condition: first_condition(self.weather),
        })
    }
}

#[derive(Debug, Deserialize)]
struct CurrentResponse {
    #[serde(default)]
    main: MainBlock,
    #[serde(default)]
    wind: WindBlock,
    #[serde(default)]
    rain: Option<RainBlock>,
    #[serde(default)]
    weather: Vec<ConditionBlock>,
    #[serde(default)]
    visibility: f64,
    #[serde(default)]
    name: Option<String>,
}

impl CurrentResponse {
    fn into_conditions(self) -> CurrentConditions {
        CurrentConditions {
            condition: first_condition(self.weather),
            temperature: self.main.temp,
            humidity: self.main.humidity,
            wind_speed: self.wind.speed,
            rainfall_1h: self.rain.map(|r| r.one_hour).unwrap_or(0.0),
            visibility_km: self.visibility / 1000.0,
            place_name: self.name.filter(|n| !n.trim().is_empty()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct AirPollutionResponse {
    #[serde(default)]
    list: Vec<AirPollutionEntry>,
}

#[derive(Debug, Deserialize)]
struct AirPollutionEntry {
    main: AqiBlock,
}

#[derive(Debug, Deserialize)]
struct AqiBlock {
    aqi: u8,
}

#[derive(Debug, Deserialize)]
struct GeoPlace {
    name: String,
}
