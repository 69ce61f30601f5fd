//! Application configuration schemas.
//!
//! All configuration structs are deserialized via the `config` crate from
//! optional TOML files plus `STORMWATCH__*` environment variables. Every
//! field carries a serde default so the service boots with no files at all.

pub mod app;
pub mod auth;
pub mod database;
pub mod logging;
pub mod messaging;
pub mod weather;
pub mod worker;

use serde::{Deserialize, Serialize};

use self::app::ServerConfig;
use self::auth::AuthConfig;
use self::database::DatabaseConfig;
use self::logging::LoggingConfig;
use self::messaging::MessagingConfig;
use self::weather::WeatherConfig;
use self::worker::WorkerConfig;

use crate::error::AppError;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database connection settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Token and verification settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// OpenWeatherMap and recommendation server settings.
    #[serde(default)]
    pub weather: WeatherConfig,
    /// Email and SMS gateway settings.
    #[serde(default)]
    pub messaging: MessagingConfig,
    /// Background job settings.
    #[serde(default)]
    pub worker: WorkerConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration for the given environment name.
    ///
    /// Merges `config/default.toml`, `config/{env}.toml` and environment
    /// variables prefixed with `STORMWATCH__` (e.g. `STORMWATCH__SERVER__PORT`).
    pub fn load(env: &str) -> Result<Self, AppError> {
        let merged = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("STORMWATCH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(merged.try_deserialize()?)
    }
}
