//! Core type definitions used across the Stormwatch workspace.

pub mod geo;
pub mod id;
pub mod weather;

pub use geo::Coordinates;
pub use id::*;
pub use weather::{AirQuality, CurrentConditions, ForecastSample, WeatherCondition};
