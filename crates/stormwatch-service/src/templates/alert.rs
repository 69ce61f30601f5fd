//! Alert description and delivery texts.

use std::fmt::Write as _;

use stormwatch_core::types::ForecastSample;
use stormwatch_entity::alert::{Alert, Severity};

use crate::weather::Assessment;

fn closing_line(severity: Severity) -> &'static str {
    match severity {
        Severity::High => "Consider rescheduling if the activity is weather-sensitive.",
        Severity::Medium => "Take necessary precautions before proceeding.",
        Severity::Low => "Weather conditions are favorable for your planned activity.",
    }
}

/// Description stored on a scheduled weather alert.
pub fn alert_description(task: &str, sample: &ForecastSample, assessment: &Assessment) -> String {
    let mut text = String::new();
    let _ = writeln!(text, "Weather forecast for your task \"{task}\":");
    let _ = writeln!(text, "Temperature: {}°C", sample.temperature);
    let _ = writeln!(text, "Conditions: {}", sample.condition);
    if sample.rain_3h > 0.0 {
        let _ = writeln!(text, "Expected Rainfall: {}mm", sample.rain_3h);
    }
    let _ = writeln!(text, "Wind Speed: {} km/h", sample.wind_speed);
    let _ = writeln!(text, "Humidity: {}%", sample.humidity);
    text.push_str("\nRecommendations:\n");
    for line in &assessment.recommendations {
        text.push_str(line);
        text.push('\n');
    }
    text.push('\n');
    text.push_str(closing_line(assessment.severity));
    text
}

/// Email body, also stored verbatim in the mail log.
pub fn delivery_email_body(alert: &Alert) -> String {
    format!(
        "{}\n\nLocation: {}\nSource: {}",
        alert.description, alert.location, alert.source
    )
}

pub fn delivery_sms(alert: &Alert) -> String {
    format!(
        "⚠️ {} ⚠️\n{}...\nLocation: {}\nSeverity: {}",
        alert.title,
        alert.headline(),
        alert.location,
        alert.severity.as_str().to_uppercase()
    )
}
