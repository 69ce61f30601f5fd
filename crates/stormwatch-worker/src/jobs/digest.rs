//! Once-a-day weather digest for every verified user with a location.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use stormwatch_core::config::worker::WorkerConfig;
use stormwatch_core::result::AppResult;
use stormwatch_core::traits::{
    Clock, EmailMessage, EmailSender, RecommendationProvider, SmsMessage, SmsSender,
    WeatherProvider,
};
use stormwatch_core::types::Coordinates;
use stormwatch_database::store::{JobMarkerStore, UserStore};
use stormwatch_entity::task::TimeOfDay;
use stormwatch_entity::user::User;
use stormwatch_service::templates::{DigestContent, digest};

use super::outcome::ChannelOutcome;
use crate::executor::{JobExecutionError, ScheduledJob};

/// Marker key in the job-marker store.
pub const JOB_NAME: &str = "daily_digest";

#[derive(Debug, Clone, Serialize)]
pub struct DigestDelivery {
    pub user_email: String,
    pub email: ChannelOutcome,
    pub sms: ChannelOutcome,
}

/// Result of one digest tick. `ran` is false when the gate was closed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DigestReport {
    pub ran: bool,
    pub date: Option<NaiveDate>,
    pub deliveries: Vec<DigestDelivery>,
    pub skipped_without_location: usize,
}

#[derive(Debug, Clone)]
pub struct DailyDigestJob {
    users: Arc<dyn UserStore>,
    markers: Arc<dyn JobMarkerStore>,
    weather: Arc<dyn WeatherProvider>,
    recommendations: Arc<dyn RecommendationProvider>,
    email: Arc<dyn EmailSender>,
    sms: Arc<dyn SmsSender>,
    clock: Arc<dyn Clock>,
    send_at: TimeOfDay,
}

impl DailyDigestJob {
    /// Fails if `digest_time` in the worker config is not `HH:MM`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        users: Arc<dyn UserStore>,
        markers: Arc<dyn JobMarkerStore>,
        weather: Arc<dyn WeatherProvider>,
        recommendations: Arc<dyn RecommendationProvider>,
        email: Arc<dyn EmailSender>,
        sms: Arc<dyn SmsSender>,
        clock: Arc<dyn Clock>,
        config: &WorkerConfig,
    ) -> AppResult<Self> {
        let send_at = config.digest_time.parse::<TimeOfDay>()?;
        Ok(Self {
            users,
            markers,
            weather,
            recommendations,
            email,
            sms,
            clock,
            send_at,
        })
    }

    pub async fn tick(&self, now: DateTime<Utc>) -> AppResult<DigestReport> {
        let local = now.with_timezone(&self.clock.local_offset());
        let today = local.date_naive();

        if local.time() < self.send_at.as_naive() {
            return Ok(DigestReport::default());
        }
        if self.markers.last_run(JOB_NAME).await? == Some(today) {
            return Ok(DigestReport::default());
        }

        let users = self.users.list_verified().await?;
        // Marked before sending so a crash mid-run cannot repeat the day.
        self.markers.record_run(JOB_NAME, today).await?;
        info!(date = %today, users = users.len(), "Sending daily digest");

        let mut report = DigestReport {
            ran: true,
            date: Some(today),
            ..Default::default()
        };
        for user in users {
            let Some(at) = user.coordinates() else {
                debug!(user_email = %user.email, "No location, skipping digest");
                report.skipped_without_location += 1;
                continue;
            };
            let delivery = self.deliver(&user, at, local).await;
            info!(
                user_email = %delivery.user_email,
                email = %delivery.email,
                sms = %delivery.sms,
                "Digest delivery finished"
            );
            report.deliveries.push(delivery);
        }
        Ok(report)
    }

    async fn deliver(
        &self,
        user: &User,
        at: Coordinates,
        local_time: DateTime<FixedOffset>,
    ) -> DigestDelivery {
        let weather = async {
            let current = self.weather.current(at).await?;
            let air_quality = self.weather.air_quality(at).await?;
            AppResult::Ok((current, air_quality))
        };
        let (current, air_quality) = match weather.await {
            Ok(pair) => pair,
            Err(e) => {
                warn!(user_email = %user.email, error = %e, "Digest weather fetch failed");
                return DigestDelivery {
                    user_email: user.email.clone(),
                    email: ChannelOutcome::failed(&e),
                    sms: ChannelOutcome::failed(&e),
                };
            }
        };

        let place = user.place_label();
        // Advice is asked for by the provider's name for the spot.
        let advice_location = current.place_name.as_deref().unwrap_or(place);
        let recommendations = self.recommendations_for(user, at, advice_location).await;
        let content = DigestContent {
            place,
            local_time,
            current: &current,
            air_quality,
            recommendations: &recommendations,
        };

        let message = EmailMessage::plain(
            &user.email,
            digest::subject(place),
            digest::text_body(&content),
        )
        .with_html(digest::html_body(&content));
        let email = match self.email.send(&message).await {
            Ok(()) => ChannelOutcome::Delivered,
            Err(e) => {
                warn!(user_email = %user.email, error = %e, "Digest email failed");
                ChannelOutcome::failed(e)
            }
        };

        let sms = if user.phone.trim().is_empty() {
            ChannelOutcome::skipped("no phone number")
        } else {
            match self
                .sms
                .send(&SmsMessage::new(&user.phone, digest::sms(&content)))
                .await
            {
                Ok(()) => ChannelOutcome::Delivered,
                Err(e) => {
                    warn!(user_email = %user.email, error = %e, "Digest SMS failed");
                    ChannelOutcome::failed(e)
                }
            }
        };

        DigestDelivery {
            user_email: user.email.clone(),
            email,
            sms,
        }
    }

    /// Empty when either the forecast or the advice server fails.
    async fn recommendations_for(&self, user: &User, at: Coordinates, place: &str) -> Vec<String> {
        let forecast = match self.weather.forecast(at).await {
            Ok(samples) => samples,
            Err(e) => {
                warn!(user_email = %user.email, error = %e, "Digest forecast fetch failed");
                return Vec::new();
            }
        };
        self.recommendations
            .recommendations(&forecast, place)
            .await
            .unwrap_or_else(|e| {
                warn!(user_email = %user.email, error = %e, "Recommendations unavailable");
                Vec::new()
            })
    }
}

#[async_trait]
impl ScheduledJob for DailyDigestJob {
    fn name(&self) -> &str {
        JOB_NAME
    }

    async fn run(&self, now: DateTime<Utc>) -> Result<Value, JobExecutionError> {
        let report = self.tick(now).await.map_err(JobExecutionError::from_app)?;
        Ok(serde_json::json!({
            "task": self.name(),
            "ran": report.ran,
            "sent": report.deliveries.len(),
            "skipped_without_location": report.skipped_without_location,
        }))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use stormwatch_core::error::AppError;
    use stormwatch_core::traits::FixedClock;
    use stormwatch_core::types::{CurrentConditions, WeatherCondition};
    use stormwatch_database::memory::{MemoryJobMarkerStore, MemoryUserStore};
    use stormwatch_entity::user::{CreateUser, UserLocation};
    use stormwatch_provider::mock::{
        MockRecommendations, MockWeatherProvider, RecordingEmailSender, RecordingSmsSender,
    };

    use super::*;

    struct Fixture {
        job: DailyDigestJob,
        users: Arc<MemoryUserStore>,
        markers: Arc<MemoryJobMarkerStore>,
        weather: Arc<MockWeatherProvider>,
        advice: Arc<MockRecommendations>,
        email: Arc<RecordingEmailSender>,
        sms: Arc<RecordingSmsSender>,
    }

    fn ist() -> FixedOffset {
        FixedOffset::east_opt(5 * 3600 + 1800).unwrap()
    }

    /// 2025-06-10 at the given IST wall-clock time.
    fn local(hour: u32, minute: u32) -> DateTime<Utc> {
        ist()
            .with_ymd_and_hms(2025, 6, 10, hour, minute, 0)
            .unwrap()
            .with_timezone(&Utc)
    }

    fn fixture() -> Fixture {
        let users = Arc::new(MemoryUserStore::new());
        let weather = Arc::new(MockWeatherProvider::new());
        let advice = Arc::new(MockRecommendations::new(vec![
            "Carry an umbrella".to_string(),
        ]));
        let email = Arc::new(RecordingEmailSender::new());
        let sms = Arc::new(RecordingSmsSender::new());
        let markers = Arc::new(MemoryJobMarkerStore::new());
        let clock = Arc::new(FixedClock::new(local(6, 0), ist()));
        let job = DailyDigestJob::new(
            users.clone(),
            markers.clone(),
            weather.clone(),
            advice.clone(),
            email.clone(),
            sms.clone(),
            clock,
            &WorkerConfig::default(),
        )
        .unwrap();
        Fixture {
            job,
            users,
            markers,
            weather,
            advice,
            email,
            sms,
        }
    }

    async fn add_user(f: &Fixture, email: &str, with_location: bool) {
        let location = with_location.then(|| UserLocation {
            coordinates: Coordinates::new(18.52, 73.85),
            place_name: "Pune".into(),
            last_updated: local(6, 0),
        });
        f.users
            .create(CreateUser {
                name: "Ravi".into(),
                email: email.into(),
                phone: "9000000002".into(),
                password_hash: "hash".into(),
                is_verified: true,
                location,
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_does_not_run_before_digest_time() {
        let f = fixture();
        add_user(&f, "ravi@example.com", true).await;

        let report = f.job.tick(local(7, 33)).await.unwrap();
        assert!(!report.ran);
        assert_eq!(f.email.attempts(), 0);
    }

    #[tokio::test]
    async fn test_runs_once_per_local_day() {
        let f = fixture();
        add_user(&f, "ravi@example.com", true).await;

        let report = f.job.tick(local(7, 34)).await.unwrap();
        assert!(report.ran);
        assert_eq!(report.date, NaiveDate::from_ymd_opt(2025, 6, 10));
        assert_eq!(report.deliveries.len(), 1);

        assert!(!f.job.tick(local(7, 35)).await.unwrap().ran);
        assert!(!f.job.tick(local(22, 0)).await.unwrap().ran);
        assert_eq!(f.email.attempts(), 1);

        let next_day = local(7, 34) + Duration::days(1);
        assert!(f.job.tick(next_day).await.unwrap().ran);
        assert_eq!(f.email.attempts(), 2);
    }

    #[tokio::test]
    async fn test_late_start_catches_up_same_day() {
        let f = fixture();
        add_user(&f, "ravi@example.com", true).await;
        assert!(f.job.tick(local(15, 10)).await.unwrap().ran);
    }

    #[tokio::test]
    async fn test_renders_email_and_sms() {
        let f = fixture();
        add_user(&f, "ravi@example.com", true).await;

        f.job.tick(local(8, 0)).await.unwrap();

        let sent = f.email.sent();
        assert_eq!(sent[0].subject, "Daily Weather Update for Pune");
        assert!(sent[0].html.as_deref().unwrap().contains("Carry an umbrella"));
        assert!(sent[0].text.contains("Air Quality: Fair"));

        let sms = f.sms.sent();
        assert!(sms[0].body.starts_with("🌞 Weather Update for Pune 🌞"));
        assert!(sms[0].body.ends_with("Tip: Carry an umbrella"));
    }

    #[tokio::test]
    async fn test_users_without_location_are_skipped() {
        let f = fixture();
        add_user(&f, "ravi@example.com", true).await;
        add_user(&f, "nomad@example.com", false).await;

        let report = f.job.tick(local(8, 0)).await.unwrap();
        assert_eq!(report.skipped_without_location, 1);
        assert_eq!(report.deliveries.len(), 1);
        assert_eq!(report.deliveries[0].user_email, "ravi@example.com");
    }

    #[tokio::test]
    async fn test_advice_failure_degrades_to_no_tips() {
        let f = fixture();
        add_user(&f, "ravi@example.com", true).await;
        f.advice.set_failing(true);

        let report = f.job.tick(local(8, 0)).await.unwrap();
        assert!(report.deliveries[0].email.is_delivered());
        assert!(f.sms.sent()[0].body.ends_with("Have a great day!"));
    }

    #[tokio::test]
    async fn test_weather_failure_marks_user_failed() {
        let f = fixture();
        add_user(&f, "ravi@example.com", true).await;
        f.weather.set_failing(true);

        let report = f.job.tick(local(8, 0)).await.unwrap();
        assert!(report.ran);
        assert!(report.deliveries[0].email.is_failed());
        assert!(report.deliveries[0].sms.is_failed());
        assert_eq!(f.email.attempts(), 0);
    }

    /// User store whose listing fails until `recover` is called.
    #[derive(Debug)]
    struct FlakyUsers {
        inner: MemoryUserStore,
        down: std::sync::atomic::AtomicBool,
    }

    impl FlakyUsers {
        fn recover(&self) {
            self.down.store(false, std::sync::atomic::Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl UserStore for FlakyUsers {
        async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
            self.inner.find_by_email(email).await
        }

        async fn find_by_identifier(&self, identifier: &str) -> AppResult<Option<User>> {
            self.inner.find_by_identifier(identifier).await
        }

        async fn exists_by_email_or_phone(&self, email: &str, phone: &str) -> AppResult<bool> {
            self.inner.exists_by_email_or_phone(email, phone).await
        }

        async fn create(&self, input: CreateUser) -> AppResult<User> {
            self.inner.create(input).await
        }

        async fn update_location(
            &self,
            id: stormwatch_core::types::UserId,
            location: &UserLocation,
        ) -> AppResult<()> {
            self.inner.update_location(id, location).await
        }

        async fn list_verified(&self) -> AppResult<Vec<User>> {
            if self.down.load(std::sync::atomic::Ordering::SeqCst) {
                return Err(AppError::database("users table unavailable"));
            }
            self.inner.list_verified().await
        }
    }

    #[tokio::test]
    async fn test_failed_user_listing_leaves_day_unmarked() {
        let f = fixture();
        let users = Arc::new(FlakyUsers {
            inner: MemoryUserStore::new(),
            down: std::sync::atomic::AtomicBool::new(true),
        });
        let job = DailyDigestJob::new(
            users.clone(),
            f.markers.clone(),
            f.weather.clone(),
            f.advice.clone(),
            f.email.clone(),
            f.sms.clone(),
            Arc::new(FixedClock::new(local(6, 0), ist())),
            &WorkerConfig::default(),
        )
        .unwrap();
        users
            .create(CreateUser {
                name: "Ravi".into(),
                email: "ravi@example.com".into(),
                phone: "9000000002".into(),
                password_hash: "hash".into(),
                is_verified: true,
                location: Some(UserLocation {
                    coordinates: Coordinates::new(18.52, 73.85),
                    place_name: "Pune".into(),
                    last_updated: local(6, 0),
                }),
            })
            .await
            .unwrap();

        let err = job.tick(local(8, 0)).await.unwrap_err();
        assert_eq!(err.kind, stormwatch_core::error::ErrorKind::Database);
        assert_eq!(f.markers.last_run(JOB_NAME).await.unwrap(), None);
        assert_eq!(f.email.attempts(), 0);

        users.recover();
        let report = job.tick(local(8, 1)).await.unwrap();
        assert!(report.ran);
        assert_eq!(report.deliveries.len(), 1);
        assert_eq!(
            f.markers.last_run(JOB_NAME).await.unwrap(),
            NaiveDate::from_ymd_opt(2025, 6, 10)
        );
    }

    #[tokio::test]
    async fn test_advice_uses_provider_place_name() {
        let f = fixture();
        add_user(&f, "ravi@example.com", true).await;
        f.weather.set_current(CurrentConditions {
            condition: WeatherCondition::Rain,
            temperature: 27.0,
            humidity: 88.0,
            wind_speed: 6.0,
            rainfall_1h: 4.2,
            visibility_km: 6.0,
            place_name: Some("Shivajinagar".into()),
        });

        f.job.tick(local(8, 0)).await.unwrap();

        assert_eq!(f.advice.locations(), ["Shivajinagar"]);
        assert_eq!(f.email.sent()[0].subject, "Daily Weather Update for Pune");
    }

    #[tokio::test]
    async fn test_advice_falls_back_to_stored_place() {
        let f = fixture();
        add_user(&f, "ravi@example.com", true).await;

        f.job.tick(local(8, 0)).await.unwrap();

        assert_eq!(f.advice.locations(), ["Pune"]);
    }

    #[test]
    fn test_rejects_bad_digest_time() {
        let config = WorkerConfig {
            digest_time: "7.34".into(),
            ..WorkerConfig::default()
        };
        let err = DailyDigestJob::new(
            Arc::new(MemoryUserStore::new()),
            Arc::new(MemoryJobMarkerStore::new()),
            Arc::new(MockWeatherProvider::new()),
            Arc::new(MockRecommendations::default()),
            Arc::new(RecordingEmailSender::new()),
            Arc::new(RecordingSmsSender::new()),
            Arc::new(FixedClock::utc(Utc::now())),
            &config,
        )
        .unwrap_err();
        assert_eq!(err.kind, stormwatch_core::error::ErrorKind::Validation);
    }
}
