//! Shared test helpers for integration tests.
//!
//! Every test gets a fresh router over in-memory stores, a pinned clock and
//! recording email/SMS senders.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{DateTime, Duration, DurationRound, Utc};
use serde_json::{Value, json};
use tower::ServiceExt;

use stormwatch_api::AppState;
use stormwatch_auth::JwtDecoder;
use stormwatch_core::config::AppConfig;
use stormwatch_core::traits::{Clock, FixedClock};
use stormwatch_core::types::{ForecastSample, WeatherCondition};
use stormwatch_database::Stores;
use stormwatch_provider::mock::{MockWeatherProvider, RecordingEmailSender, RecordingSmsSender};
use stormwatch_service::{AccountService, AlertScheduler, NotificationService, TaskService};
use stormwatch_worker::DeliveryDispatcher;

pub const PASSWORD: &str = "monsoon42";

/// Test application context
pub struct TestApp {
    pub router: Router,
    pub stores: Stores,
    pub weather: Arc<MockWeatherProvider>,
    pub email: Arc<RecordingEmailSender>,
    pub sms: Arc<RecordingSmsSender>,
    pub clock: Arc<FixedClock>,
    pub dispatcher: DeliveryDispatcher,
}

/// A 3-hourly forecast covering today and tomorrow (UTC).
pub fn forecast_from(start: DateTime<Utc>, temperature: f64) -> Vec<ForecastSample> {
    (0..16)
        .map(|i| ForecastSample {
            timestamp: start + Duration::hours(3 * i),
            temperature,
            humidity: 60.0,
            wind_speed: 4.0,
            rain_3h: 0.0,
            condition: WeatherCondition::Clouds,
        })
        .collect()
}

impl TestApp {
    pub fn new() -> Self {
        let config = AppConfig::default();
        // Tokens are checked against the real clock, so stay close to it.
        let now = Utc::now();
        let clock = Arc::new(FixedClock::utc(now));
        let day_start = now
            .duration_trunc(Duration::days(1))
            .unwrap_or(now);

        let stores = Stores::in_memory();
        let weather = Arc::new(
            MockWeatherProvider::new()
                .with_place("Pune")
                .with_forecast(forecast_from(day_start, 36.5)),
        );
        let email = Arc::new(RecordingEmailSender::new());
        let sms = Arc::new(RecordingSmsSender::new());
        let dyn_clock: Arc<dyn Clock> = clock.clone();

        let scheduler = AlertScheduler::new(
            Arc::clone(&stores.users),
            Arc::clone(&stores.alerts),
            weather.clone(),
            Arc::clone(&dyn_clock),
            config.weather.default_location,
            &config.worker,
        );
        let state = AppState {
            jwt_decoder: Arc::new(JwtDecoder::new(&config.auth)),
            accounts: AccountService::new(
                Arc::clone(&stores.users),
                weather.clone(),
                email.clone(),
                sms.clone(),
                Arc::clone(&dyn_clock),
                &config.auth,
            ),
            tasks: TaskService::new(
                Arc::clone(&stores.tasks),
                Arc::clone(&stores.users),
                scheduler,
                sms.clone(),
            ),
            notifications: NotificationService::new(
                Arc::clone(&stores.alerts),
                Arc::clone(&dyn_clock),
            ),
            clock: dyn_clock,
        };
        let dispatcher = DeliveryDispatcher::new(
            Arc::clone(&stores.alerts),
            Arc::clone(&stores.users),
            Arc::clone(&stores.mail_log),
            email.clone(),
            sms.clone(),
        );

        Self {
            router: stormwatch_api::build_app(state, &config.server),
            stores,
            weather,
            email,
            sms,
            clock,
            dispatcher,
        }
    }

    /// The code from the most recent verification email.
    pub fn last_code(&self) -> String {
        let sent = self.email.sent();
        let body = &sent.last().expect("no verification email sent").text;
        body.rsplit(' ').next().unwrap_or_default().trim().to_string()
    }

    /// Register and verify an account; returns its bearer token.
    pub async fn sign_up(&self, name: &str, email: &str, phone: &str) -> String {
        let response = self
            .request(
                "POST",
                "/api/register",
                Some(json!({
                    "name": name,
                    "email": email,
                    "phone": phone,
                    "password": PASSWORD,
                    "coordinates": { "lat": 18.52, "lon": 73.85 },
                })),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "register: {:?}", response.body);

        let response = self
            .request(
                "POST",
                "/api/verify",
                Some(json!({ "email": email, "code": self.last_code() })),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "verify: {:?}", response.body);

        response.body["token"]
            .as_str()
            .expect("No token in verify response")
            .to_string()
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {}", token));
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}
