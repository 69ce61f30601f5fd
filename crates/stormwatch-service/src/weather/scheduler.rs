//! Turns a task's time of day into a pending weather alert.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};

use stormwatch_core::config::worker::WorkerConfig;
use stormwatch_core::error::AppError;
use stormwatch_core::result::AppResult;
use stormwatch_core::traits::{Clock, WeatherProvider};
use stormwatch_core::types::{Coordinates, ForecastSample};
use stormwatch_database::store::{AlertStore, UserStore};
use stormwatch_entity::alert::{Alert, AlertCategory, CreateAlert};
use stormwatch_entity::task::TimeOfDay;
use stormwatch_entity::user::FALLBACK_PLACE;

use super::classifier::classify;
use crate::templates::alert::alert_description;

const ALERT_SOURCE: &str = "OpenWeatherMap";

/// The two forecast samples an alert is built from.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastWindow {
    /// Sample nearest to the alert's trigger instant.
    pub alert: ForecastSample,
    /// Sample nearest to the task itself; this one is classified.
    pub task: ForecastSample,
}

impl ForecastWindow {
    /// Pick the samples nearest to `trigger` and `task_at`. `None` for an
    /// empty series.
    pub fn select(
        samples: &[ForecastSample],
        trigger: DateTime<Utc>,
        task_at: DateTime<Utc>,
    ) -> Option<Self> {
        Some(Self {
            alert: nearest(samples, trigger)?.clone(),
            task: nearest(samples, task_at)?.clone(),
        })
    }
}

/// Sample with the smallest absolute distance to `target`; ties keep the
/// earlier sample in the series.
fn nearest(samples: &[ForecastSample], target: DateTime<Utc>) -> Option<&ForecastSample> {
    let distance = |s: &ForecastSample| (s.timestamp - target).num_seconds().abs();
    samples.iter().fold(None, |best, s| match best {
        Some(b) if distance(b) <= distance(s) => Some(b),
        _ => Some(s),
    })
}

/// Creates pending alerts ahead of user tasks.
#[derive(Debug, Clone)]
pub struct AlertScheduler {
    users: Arc<dyn UserStore>,
    alerts: Arc<dyn AlertStore>,
    weather: Arc<dyn WeatherProvider>,
    clock: Arc<dyn Clock>,
    default_location: Coordinates,
    lead: Duration,
}

impl AlertScheduler {
    pub fn new(
        users: Arc<dyn UserStore>,
        alerts: Arc<dyn AlertStore>,
        weather: Arc<dyn WeatherProvider>,
        clock: Arc<dyn Clock>,
        default_location: Coordinates,
        worker: &WorkerConfig,
    ) -> Self {
        Self {
            users,
            alerts,
            weather,
            clock,
            default_location,
            lead: Duration::minutes(worker.alert_lead_minutes),
        }
    }

    /// Schedule the weather alert for `task` at `time` (`HH:MM`, server-local,
    /// today). Failures are logged and reported as `false`.
    pub async fn schedule(&self, task: &str, time: &str, owner_email: &str) -> bool {
        match self.try_schedule(task, time, owner_email).await {
            Ok(alert) => {
                info!(
                    alert_id = %alert.id,
                    user_email = %owner_email,
                    severity = %alert.severity,
                    trigger_time = ?alert.trigger_time,
                    "Weather alert scheduled"
                );
                true
            }
            Err(e) => {
                warn!(user_email = %owner_email, task, time, error = %e, "Weather alert not scheduled");
                false
            }
        }
    }

    /// Fallible form of [`AlertScheduler::schedule`].
    pub async fn try_schedule(&self, task: &str, time: &str, owner_email: &str) -> AppResult<Alert> {
        let time_of_day: TimeOfDay = time.parse()?;
        let task_at = time_of_day
            .on_date_of(self.clock.local_now())
            .ok_or_else(|| AppError::validation(format!("Time '{time}' does not exist today")))?;
        let trigger = task_at - self.lead;

        let owner = self.users.find_by_email(owner_email).await?;
        let at = owner
            .as_ref()
            .and_then(|u| u.coordinates())
            .unwrap_or(self.default_location);
        let place = owner
            .as_ref()
            .map(|u| u.place_label().to_string())
            .unwrap_or_else(|| FALLBACK_PLACE.to_string());

        let samples = self.weather.forecast(at).await?;
        let window = ForecastWindow::select(&samples, trigger, task_at)
            .ok_or_else(|| AppError::provider("Forecast contained no samples"))?;
        debug!(
            alert_sample = %window.alert.timestamp,
            task_sample = %window.task.timestamp,
            "Forecast samples selected"
        );

        let assessment = classify(&window.task);
        let description = alert_description(task, &window.task, &assessment);

        self.alerts
            .create(CreateAlert {
                user_email: owner_email.to_string(),
                category: AlertCategory::Weather,
                title: format!("Weather Alert for: {task}"),
                severity: assessment.severity,
                location: place,
                description,
                source: ALERT_SOURCE.to_string(),
                trigger_time: Some(trigger),
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, TimeZone};

    use stormwatch_core::traits::FixedClock;
    use stormwatch_core::types::WeatherCondition;
    use stormwatch_database::memory::{MemoryAlertStore, MemoryUserStore};
    use stormwatch_entity::alert::Severity;
    use stormwatch_entity::user::{CreateUser, UserLocation};
    use stormwatch_provider::mock::MockWeatherProvider;

    use super::*;

    fn utc(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 10, h, m, 0).unwrap()
    }

    fn sample(at: DateTime<Utc>, temperature: f64) -> ForecastSample {
        ForecastSample {
            timestamp: at,
            temperature,
            humidity: 40.0,
            wind_speed: 3.0,
            rain_3h: 0.0,
            condition: WeatherCondition::Clear,
        }
    }

    struct Fixture {
        scheduler: AlertScheduler,
        alerts: Arc<MemoryAlertStore>,
        users: Arc<MemoryUserStore>,
        weather: Arc<MockWeatherProvider>,
    }

    fn fixture(samples: Vec<ForecastSample>) -> Fixture {
        let users = Arc::new(MemoryUserStore::new());
        let alerts = Arc::new(MemoryAlertStore::new());
        let weather = Arc::new(MockWeatherProvider::new().with_forecast(samples));
        let clock = Arc::new(FixedClock::new(utc(8, 0), FixedOffset::east_opt(0).unwrap()));
        let scheduler = AlertScheduler::new(
            users.clone(),
            alerts.clone(),
            weather.clone(),
            clock,
            Coordinates::DEFAULT_LOCATION,
            &WorkerConfig::default(),
        );
        Fixture {
            scheduler,
            alerts,
            users,
            weather,
        }
    }

    #[test]
    fn test_nearest_sample_selection() {
        let samples = vec![
            sample(utc(9, 0), 20.0),
            sample(utc(11, 55), 21.0),
            sample(utc(14, 5), 22.0),
            sample(utc(17, 0), 23.0),
        ];
        let window = ForecastWindow::select(&samples, utc(12, 0), utc(14, 0)).unwrap();
        assert_eq!(window.alert.timestamp, utc(11, 55));
        assert_eq!(window.task.timestamp, utc(14, 5));
    }

    #[test]
    fn test_nearest_tie_keeps_first() {
        let samples = vec![sample(utc(11, 0), 1.0), sample(utc(13, 0), 2.0)];
        let window = ForecastWindow::select(&samples, utc(12, 0), utc(12, 0)).unwrap();
        assert_eq!(window.task.temperature, 1.0);
        assert!(ForecastWindow::select(&[], utc(12, 0), utc(12, 0)).is_none());
    }

    #[tokio::test]
    async fn test_schedule_persists_pending_alert_two_hours_ahead() {
        let f = fixture(vec![sample(utc(11, 55), 20.0), sample(utc(14, 5), 36.5)]);

        assert!(f.scheduler.schedule("Cricket match", "14:00", "asha@example.com").await);

        let stored = f.alerts.all();
        assert_eq!(stored.len(), 1);
        let alert = &stored[0];
        assert_eq!(alert.trigger_time, Some(utc(12, 0)));
        assert!(!alert.delivered);
        assert_eq!(alert.category, AlertCategory::Weather);
        assert_eq!(alert.severity, Severity::High);
        assert_eq!(alert.title, "Weather Alert for: Cricket match");
        assert_eq!(alert.location, FALLBACK_PLACE);
        assert_eq!(alert.source, "OpenWeatherMap");
        assert!(alert.description.contains("Temperature: 36.5°C"));
        assert_eq!(f.weather.requested(), vec![Coordinates::DEFAULT_LOCATION]);
    }

    #[tokio::test]
    async fn test_trigger_is_exactly_lead_before_task() {
        let f = fixture(vec![sample(utc(12, 0), 20.0)]);
        for time in ["00:00", "01:59", "09:30", "23:59"] {
            let alert = f.scheduler.try_schedule("Walk", time, "a@example.com").await.unwrap();
            let task_at: TimeOfDay = time.parse().unwrap();
            let expected = Utc
                .from_utc_datetime(&utc(0, 0).date_naive().and_time(task_at.as_naive()))
                - Duration::hours(2);
            assert_eq!(alert.trigger_time, Some(expected), "time {time}");
        }
    }

    #[tokio::test]
    async fn test_uses_owner_location_and_place() {
        let f = fixture(vec![sample(utc(12, 0), 20.0)]);
        let pune = Coordinates::new(18.52, 73.85);
        f.users
            .create(CreateUser {
                name: "Asha".into(),
                email: "asha@example.com".into(),
                phone: "9000000001".into(),
                password_hash: "hash".into(),
                is_verified: true,
                location: Some(UserLocation {
                    coordinates: pune,
                    place_name: "Pune".into(),
                    last_updated: utc(7, 0),
                }),
            })
            .await
            .unwrap();

        assert!(f.scheduler.schedule("Yoga", "18:00", "asha@example.com").await);
        assert_eq!(f.weather.requested(), vec![pune]);
        assert_eq!(f.alerts.all()[0].location, "Pune");
    }

    #[tokio::test]
    async fn test_empty_or_failed_forecast_persists_nothing() {
        let f = fixture(vec![]);
        assert!(!f.scheduler.schedule("Walk", "10:00", "a@example.com").await);

        f.weather.set_forecast(vec![sample(utc(12, 0), 20.0)]);
        f.weather.set_failing(true);
        assert!(!f.scheduler.schedule("Walk", "10:00", "a@example.com").await);

        assert!(f.alerts.all().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_time_is_rejected_before_fetching() {
        let f = fixture(vec![sample(utc(12, 0), 20.0)]);
        assert!(!f.scheduler.schedule("Walk", "25:00", "a@example.com").await);
        assert_eq!(f.weather.forecast_calls(), 0);
        assert!(f.alerts.all().is_empty());
    }
}
