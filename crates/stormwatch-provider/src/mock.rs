//! In-process fakes for tests. Enabled by the `mock` feature.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use stormwatch_core::error::AppError;
use stormwatch_core::result::AppResult;
use stormwatch_core::traits::{
    EmailMessage, EmailSender, RecommendationProvider, SmsMessage, SmsSender, WeatherProvider,
};
use stormwatch_core::types::{
    AirQuality, Coordinates, CurrentConditions, ForecastSample, WeatherCondition,
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Weather provider returning canned data.
#[derive(Debug)]
pub struct MockWeatherProvider {
    forecast: Mutex<Vec<ForecastSample>>,
    current: Mutex<CurrentConditions>,
    aqi: Mutex<u8>,
    place: Mutex<Option<String>>,
    failing: AtomicBool,
    forecast_calls: AtomicUsize,
    requested: Mutex<Vec<Coordinates>>,
}

impl Default for MockWeatherProvider {
    fn default() -> Self {
        Self {
            forecast: Mutex::new(Vec::new()),
            current: Mutex::new(CurrentConditions {
                condition: WeatherCondition::Clear,
                temperature: 22.0,
                humidity: 55.0,
                wind_speed: 3.0,
                rainfall_1h: 0.0,
                visibility_km: 10.0,
                place_name: None,
            }),
            aqi: Mutex::new(2),
            place: Mutex::new(None),
            failing: AtomicBool::new(false),
            forecast_calls: AtomicUsize::new(0),
            requested: Mutex::new(Vec::new()),
        }
    }
}

impl MockWeatherProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_forecast(self, samples: Vec<ForecastSample>) -> Self {
        self.set_forecast(samples);
        self
    }

    pub fn with_place(self, name: impl Into<String>) -> Self {
        *lock(&self.place) = Some(name.into());
        self
    }

    pub fn with_current(self, current: CurrentConditions) -> Self {
        self.set_current(current);
        self
    }

    pub fn set_current(&self, current: CurrentConditions) {
        *lock(&self.current) = current;
    }

    pub fn set_forecast(&self, samples: Vec<ForecastSample>) {
        *lock(&self.forecast) = samples;
    }

    /// Make every call fail with a provider error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn forecast_calls(&self) -> usize {
        self.forecast_calls.load(Ordering::SeqCst)
    }

    /// Coordinates passed to `forecast` and `current`, in call order.
    pub fn requested(&self) -> Vec<Coordinates> {
        lock(&self.requested).clone()
    }

    fn check(&self) -> AppResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            Err(AppError::provider("weather provider unavailable"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl WeatherProvider for MockWeatherProvider {
    async fn forecast(&self, at: Coordinates) -> AppResult<Vec<ForecastSample>> {
        self.forecast_calls.fetch_add(1, Ordering::SeqCst);
        lock(&self.requested).push(at);
        self.check()?;
        Ok(lock(&self.forecast).clone())
    }

    async fn current(&self, at: Coordinates) -> AppResult<CurrentConditions> {
        lock(&self.requested).push(at);
        self.check()?;
        Ok(lock(&self.current).clone())
    }

    async fn air_quality(&self, _at: Coordinates) -> AppResult<AirQuality> {
        self.check()?;
        Ok(AirQuality { aqi: *lock(&self.aqi) })
    }

    async fn reverse_geocode(&self, _at: Coordinates) -> AppResult<Option<String>> {
        self.check()?;
        Ok(lock(&self.place).clone())
    }
}

/// Recommendation provider returning a fixed list.
#[derive(Debug, Default)]
pub struct MockRecommendations {
    items: Mutex<Vec<String>>,
    locations: Mutex<Vec<String>>,
    failing: AtomicBool,
}

impl MockRecommendations {
    pub fn new(items: Vec<String>) -> Self {
        Self {
            items: Mutex::new(items),
            ..Self::default()
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Location names passed to `recommendations`, in call order.
    pub fn locations(&self) -> Vec<String> {
        lock(&self.locations).clone()
    }
}

#[async_trait]
impl RecommendationProvider for MockRecommendations {
    async fn recommendations(
        &self,
        _forecast: &[ForecastSample],
        location: &str,
    ) -> AppResult<Vec<String>> {
        lock(&self.locations).push(location.to_string());
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::provider("recommendation server unavailable"));
        }
        Ok(lock(&self.items).clone())
    }
}

/// Email sender that records every message it accepts.
#[derive(Debug, Default)]
pub struct RecordingEmailSender {
    sent: Mutex<Vec<EmailMessage>>,
    attempts: AtomicUsize,
    failing: AtomicBool,
}

impl RecordingEmailSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Messages accepted so far.
    pub fn sent(&self) -> Vec<EmailMessage> {
        lock(&self.sent).clone()
    }

    /// Calls to `send`, including failed ones.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmailSender for RecordingEmailSender {
    async fn send(&self, message: &EmailMessage) -> AppResult<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::messaging("SMTP relay refused the message"));
        }
        lock(&self.sent).push(message.clone());
        Ok(())
    }
}

/// SMS sender that records every message it accepts.
#[derive(Debug, Default)]
pub struct RecordingSmsSender {
    sent: Mutex<Vec<SmsMessage>>,
    attempts: AtomicUsize,
    failing: AtomicBool,
}

impl RecordingSmsSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<SmsMessage> {
        lock(&self.sent).clone()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SmsSender for RecordingSmsSender {
    async fn send(&self, message: &SmsMessage) -> AppResult<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::messaging("SMS gateway rejected the message"));
        }
        lock(&self.sent).push(message.clone());
        Ok(())
    }
}
