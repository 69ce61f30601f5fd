//! Daily weather digest rendering.

use chrono::{DateTime, FixedOffset};

use stormwatch_core::types::{AirQuality, CurrentConditions, WeatherCondition};

/// Everything one user's digest shows.
#[derive(Debug, Clone)]
pub struct DigestContent<'a> {
    pub place: &'a str,
    /// Server-local time the digest was rendered.
    pub local_time: DateTime<FixedOffset>,
    pub current: &'a CurrentConditions,
    pub air_quality: AirQuality,
    pub recommendations: &'a [String],
}

pub fn status_icon(condition: &WeatherCondition) -> &'static str {
    match condition {
        WeatherCondition::Clear => "☀️",
        WeatherCondition::Clouds => "☁️",
        WeatherCondition::Rain => "🌧️",
        WeatherCondition::Drizzle => "🌦️",
        WeatherCondition::Thunderstorm => "⛈️",
        WeatherCondition::Snow => "❄️",
        WeatherCondition::Mist => "🌫️",
        WeatherCondition::Fog | WeatherCondition::Other(_) => "🌤️",
    }
}

pub fn temperature_colour(celsius: f64) -> &'static str {
    if celsius >= 30.0 {
        "#FF4444"
    } else if celsius >= 20.0 {
        "#FF8C00"
    } else if celsius >= 10.0 {
        "#32CD32"
    } else {
        "#00BFFF"
    }
}

pub fn recommendation_icon(recommendation: &str) -> &'static str {
    let lower = recommendation.to_lowercase();
    if lower.contains("umbrella") {
        "☔"
    } else if lower.contains("sun") || lower.contains("hat") {
        "🧢"
    } else if lower.contains("wind") {
        "💨"
    } else if lower.contains("rain") {
        "🌧️"
    } else {
        "💡"
    }
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn subject(place: &str) -> String {
    format!("Daily Weather Update for {place}")
}

/// Plain-text alternative for clients that do not render HTML.
pub fn text_body(content: &DigestContent<'_>) -> String {
    let c = content.current;
    let mut lines = vec![
        format!("Daily Weather Update for {}", content.place),
        content.local_time.format("%A, %B %-d, %Y, %I:%M %p").to_string(),
        String::new(),
        format!("{} {}°C, {}", status_icon(&c.condition), c.temperature, c.condition),
        format!("Humidity: {}%", c.humidity),
        format!("Wind Speed: {} km/h", c.wind_speed),
        format!("Rainfall: {} mm", c.rainfall_1h),
        format!("Visibility: {} km", c.visibility_km),
        format!("Air Quality: {}", content.air_quality.label()),
    ];
    if !content.recommendations.is_empty() {
        lines.push(String::new());
        lines.push("Today's Recommendations".to_string());
        lines.extend(
            content
                .recommendations
                .iter()
                .map(|r| format!("{} {r}", recommendation_icon(r))),
        );
    }
    lines.join("\n")
}

pub fn html_body(content: &DigestContent<'_>) -> String {
    let c = content.current;
    let place = escape_html(content.place);
    let when = content.local_time.format("%A, %B %-d, %Y, %I:%M %p");
    let recommendations: String = content
        .recommendations
        .iter()
        .map(|r| {
            format!(
                r#"<div class="recommendation-item">{} {}</div>"#,
                recommendation_icon(r),
                escape_html(r)
            )
        })
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <style>
    body {{ font-family: Arial, sans-serif; line-height: 1.6; color: #333; margin: 0; padding: 0; }}
    .container {{ max-width: 600px; margin: 0 auto; padding: 20px; }}
    .header {{ background: linear-gradient(135deg, #1e3c72 0%, #2a5298 100%); color: white; padding: 20px; text-align: center; border-radius: 10px 10px 0 0; }}
    .content {{ background: #ffffff; padding: 20px; border-radius: 0 0 10px 10px; }}
    .weather-icon {{ font-size: 48px; margin: 10px 0; }}
    .temperature {{ font-size: 36px; font-weight: bold; color: {colour}; margin: 10px 0; }}
    .weather-grid {{ display: grid; grid-template-columns: repeat(2, 1fr); gap: 15px; margin: 20px 0; }}
    .weather-item {{ background: #f8f9fa; padding: 15px; border-radius: 8px; text-align: center; }}
    .recommendations {{ margin-top: 20px; padding: 15px; background: #f8f9fa; border-radius: 8px; }}
    .recommendation-item {{ margin: 10px 0; padding: 10px; background: white; border-radius: 5px; }}
    .footer {{ margin-top: 20px; text-align: center; color: #666; font-size: 12px; }}
  </style>
</head>
<body>
  <div class="container">
    <div class="header">
      <h1>Daily Weather Update</h1>
      <p>{place}</p>
      <p>{when}</p>
    </div>
    <div class="content">
      <div style="text-align: center;">
        <div class="weather-icon">{icon}</div>
        <div class="temperature">{temperature}°C</div>
        <p style="font-size: 18px; color: #666;">{status}</p>
      </div>
      <div class="weather-grid">
        <div class="weather-item"><p>💧 Humidity</p><strong>{humidity}%</strong></div>
        <div class="weather-item"><p>💨 Wind Speed</p><strong>{wind} km/h</strong></div>
        <div class="weather-item"><p>🌧️ Rainfall</p><strong>{rain} mm</strong></div>
        <div class="weather-item"><p>👁️ Visibility</p><strong>{visibility} km</strong></div>
        <div class="weather-item"><p>🌬️ Air Quality</p><strong>{aqi}</strong></div>
      </div>
      <div class="recommendations">
        <h2>Today's Recommendations</h2>
        {recommendations}
      </div>
      <div class="footer">
        <p>Stay safe and have a great day!</p>
        <p style="color: #999;">This is an automated weather report. Please do not reply to this email.</p>
      </div>
    </div>
  </div>
</body>
</html>"#,
        colour = temperature_colour(c.temperature),
        icon = status_icon(&c.condition),
        temperature = c.temperature,
        status = escape_html(c.condition.as_str()),
        humidity = c.humidity,
        wind = c.wind_speed,
        rain = c.rainfall_1h,
        visibility = c.visibility_km,
        aqi = content.air_quality.label(),
    )
}

pub fn sms(content: &DigestContent<'_>) -> String {
    let c = content.current;
    let tip = content
        .recommendations
        .first()
        .map(|r| format!("Tip: {r}"))
        .unwrap_or_else(|| "Have a great day!".to_string());
    format!(
        "🌞 Weather Update for {} 🌞\nTemp: {}°C | {}\n💧 Humidity: {}% | 💨 Wind: {} km/h\n{tip}",
        content.place, c.temperature, c.condition, c.humidity, c.wind_speed
    )
}
