//! Weather data and recommendation clients.

mod insights;
mod openweather;

pub use insights::AiRecommendationClient;
pub use openweather::OpenWeatherClient;
