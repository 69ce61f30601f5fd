//! Severity classification of a single forecast sample.
//!
//! Temperature, rain and wind are evaluated independently and the overall
//! severity is the highest level any of them reaches. Recommendations are
//! listed in the order temperature, rain, wind, condition.

use stormwatch_core::types::{ForecastSample, WeatherCondition};
use stormwatch_entity::alert::Severity;

/// Result of classifying one forecast sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assessment {
    pub severity: Severity,
    pub recommendations: Vec<String>,
}

type Rule = Option<(Severity, &'static str)>;

fn temperature_rule(celsius: f64) -> Rule {
    if celsius > 35.0 {
        Some((
            Severity::High,
            "Extreme heat conditions. Consider rescheduling outdoor activities.",
        ))
    } else if celsius >= 30.0 {
        Some((
            Severity::Medium,
            "High temperature. Stay hydrated and avoid prolonged sun exposure.",
        ))
    } else if celsius < 5.0 {
        Some((
            Severity::Medium,
            "Cold conditions. Dress warmly and be cautious of icy surfaces.",
        ))
    } else {
        None
    }
}

fn rain_rule(mm_3h: f64) -> Rule {
    if mm_3h > 10.0 {
        Some((
            Severity::High,
            "Heavy rain expected. Consider indoor alternatives.",
        ))
    } else if mm_3h > 5.0 {
        Some((Severity::Medium, "Moderate rain expected. Carry an umbrella."))
    } else {
        None
    }
}

fn wind_rule(speed: f64) -> Rule {
    if speed > 20.0 {
        Some((
            Severity::High,
            "Strong winds expected. Be cautious of outdoor activities.",
        ))
    } else if speed > 10.0 {
        Some((Severity::Medium, "Moderate winds. Secure loose objects."))
    } else {
        None
    }
}

fn condition_advice(condition: &WeatherCondition) -> Option<&'static str> {
    match condition {
        WeatherCondition::Rain => Some("Bring rain gear and waterproof clothing."),
        WeatherCondition::Snow => Some("Snow expected. Check road conditions before traveling."),
        WeatherCondition::Thunderstorm => {
            Some("Thunderstorms expected. Stay indoors if possible.")
        }
        WeatherCondition::Clear => Some("Clear weather conditions. Good for outdoor activities."),
        WeatherCondition::Clouds => Some("Cloudy conditions. Good for most activities."),
        WeatherCondition::Fog => Some("Foggy conditions. Be cautious while traveling."),
        WeatherCondition::Drizzle | WeatherCondition::Mist | WeatherCondition::Other(_) => None,
    }
}

/// Classify a forecast sample. Never fails; NaN readings trigger no rule.
pub fn classify(sample: &ForecastSample) -> Assessment {
    let rules = [
        temperature_rule(sample.temperature),
        rain_rule(sample.rain_3h),
        wind_rule(sample.wind_speed),
    ];

    let severity = rules
        .iter()
        .flatten()
        .map(|(severity, _)| *severity)
        .max()
        .unwrap_or(Severity::Low);

    let recommendations = rules
        .iter()
        .flatten()
        .map(|(_, advice)| *advice)
        .chain(condition_advice(&sample.condition))
        .map(str::to_string)
        .collect();

    Assessment {
        severity,
        recommendations,
    }
}
