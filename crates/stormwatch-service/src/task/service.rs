//! Task CRUD with alert scheduling on create.

use std::sync::Arc;

use tracing::{info, warn};

use stormwatch_core::error::AppError;
use stormwatch_core::result::AppResult;
use stormwatch_core::traits::{SmsMessage, SmsSender};
use stormwatch_core::types::TaskId;
use stormwatch_database::store::{TaskStore, UserStore};
use stormwatch_entity::task::{CreateTask, Task, TimeOfDay};

use crate::context::RequestContext;
use crate::templates::account::task_added_sms;
use crate::weather::AlertScheduler;

/// A created task and whether its weather alert was scheduled.
#[derive(Debug, Clone)]
pub struct AddedTask {
    pub task: Task,
    pub alert_scheduled: bool,
}

/// Lists, creates and deletes the caller's tasks.
#[derive(Debug, Clone)]
pub struct TaskService {
    tasks: Arc<dyn TaskStore>,
    users: Arc<dyn UserStore>,
    scheduler: AlertScheduler,
    sms: Arc<dyn SmsSender>,
}

impl TaskService {
    pub fn new(
        tasks: Arc<dyn TaskStore>,
        users: Arc<dyn UserStore>,
        scheduler: AlertScheduler,
        sms: Arc<dyn SmsSender>,
    ) -> Self {
        Self {
            tasks,
            users,
            scheduler,
            sms,
        }
    }

    pub async fn list(&self, ctx: &RequestContext) -> AppResult<Vec<Task>> {
        self.tasks.list_for_user(&ctx.email).await
    }

    /// Store a task, schedule its weather alert and confirm by SMS.
    ///
    /// `owner_email`, when given, must name the caller.
    pub async fn add(
        &self,
        ctx: &RequestContext,
        task: &str,
        time: &str,
        owner_email: Option<&str>,
    ) -> AppResult<AddedTask> {
        let description = task.trim();
        if description.is_empty() {
            return Err(AppError::validation("Task description is required"));
        }
        let time_of_day: TimeOfDay = time.parse()?;
        if let Some(owner) = owner_email {
            ctx.ensure_owner(owner)?;
        }

        let task = self
            .tasks
            .create(CreateTask {
                user_email: ctx.email.clone(),
                task: description.to_string(),
                time: time_of_day.to_string(),
            })
            .await?;
        info!(task_id = %task.id, user_email = %ctx.email, time = %task.time, "Task created");

        let alert_scheduled = self
            .scheduler
            .schedule(&task.task, &task.time, &ctx.email)
            .await;
        info!(task_id = %task.id, alert_scheduled, "Weather alert scheduling finished");

        self.confirm_by_sms(ctx, &task).await;

        Ok(AddedTask {
            task,
            alert_scheduled,
        })
    }

    /// Delete one of the caller's tasks by its string id.
    pub async fn delete(&self, ctx: &RequestContext, id: &str) -> AppResult<()> {
        let id: TaskId = id
            .parse()
            .map_err(|_| AppError::validation(format!("Invalid task id '{id}'")))?;
        let task = self
            .tasks
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Task not found"))?;
        ctx.ensure_owner(&task.user_email)?;

        if !self.tasks.delete(id).await? {
            return Err(AppError::not_found("Task not found"));
        }
        info!(task_id = %id, user_email = %ctx.email, "Task deleted");
        Ok(())
    }

    async fn confirm_by_sms(&self, ctx: &RequestContext, task: &Task) {
        let phone = match self.users.find_by_email(&ctx.email).await {
            Ok(Some(user)) if !user.phone.is_empty() => user.phone,
            Ok(_) => return,
            Err(e) => {
                warn!(user_email = %ctx.email, error = %e, "Owner lookup for task SMS failed");
                return;
            }
        };
        let message = SmsMessage::new(phone, task_added_sms(&task.task, &task.time));
        if let Err(e) = self.sms.send(&message).await {
            warn!(task_id = %task.id, error = %e, "Task confirmation SMS failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, TimeZone, Utc};

    use stormwatch_core::config::worker::WorkerConfig;
    use stormwatch_core::error::ErrorKind;
    use stormwatch_core::traits::FixedClock;
    use stormwatch_core::types::{Coordinates, ForecastSample, WeatherCondition};
    use stormwatch_database::memory::{MemoryAlertStore, MemoryTaskStore, MemoryUserStore};
    use stormwatch_entity::user::CreateUser;
    use stormwatch_provider::mock::{MockWeatherProvider, RecordingSmsSender};

    use super::*;

    struct Fixture {
        service: TaskService,
        tasks: Arc<MemoryTaskStore>,
        alerts: Arc<MemoryAlertStore>,
        weather: Arc<MockWeatherProvider>,
        sms: Arc<RecordingSmsSender>,
    }

    async fn fixture() -> Fixture {
        let now = Utc.with_ymd_and_hms(2025, 6, 10, 6, 0, 0).unwrap();
        let users = Arc::new(MemoryUserStore::new());
        users
            .create(CreateUser {
                name: "Asha".into(),
                email: "asha@example.com".into(),
                phone: "9000000001".into(),
                password_hash: "hash".into(),
                is_verified: true,
                location: None,
            })
            .await
            .unwrap();
        let tasks = Arc::new(MemoryTaskStore::new());
        let alerts = Arc::new(MemoryAlertStore::new());
        let weather = Arc::new(MockWeatherProvider::new().with_forecast(vec![ForecastSample {
            timestamp: now,
            temperature: 25.0,
            humidity: 50.0,
            wind_speed: 2.0,
            rain_3h: 0.0,
            condition: WeatherCondition::Clear,
        }]));
        let sms = Arc::new(RecordingSmsSender::new());
        let scheduler = AlertScheduler::new(
            users.clone(),
            alerts.clone(),
            weather.clone(),
            Arc::new(FixedClock::new(now, FixedOffset::east_opt(0).unwrap())),
            Coordinates::DEFAULT_LOCATION,
            &WorkerConfig::default(),
        );
        let service = TaskService::new(tasks.clone(), users, scheduler, sms.clone());
        Fixture {
            service,
            tasks,
            alerts,
            weather,
            sms,
        }
    }

    fn ctx(email: &str) -> RequestContext {
        RequestContext::new(email, Utc::now())
    }

    #[tokio::test]
    async fn test_add_schedules_alert_and_confirms() {
        let f = fixture().await;
        let added = f
            .service
            .add(&ctx("asha@example.com"), "Morning run", "7:30", None)
            .await
            .unwrap();
        assert!(added.alert_scheduled);
        assert_eq!(added.task.time, "07:30");
        assert_eq!(f.alerts.all().len(), 1);
        assert_eq!(f.sms.sent()[0].to, "9000000001");
        assert!(f.sms.sent()[0].body.contains("Task: Morning run"));

        let listed = f.service.list(&ctx("asha@example.com")).await.unwrap();
        assert_eq!(listed.len(), 1);
    }

    #[tokio::test]
    async fn test_add_keeps_task_when_scheduling_fails() {
        let f = fixture().await;
        f.weather.set_failing(true);
        let added = f
            .service
            .add(&ctx("asha@example.com"), "Picnic", "13:00", None)
            .await
            .unwrap();
        assert!(!added.alert_scheduled);
        assert_eq!(f.tasks.len(), 1);
        assert!(f.alerts.all().is_empty());
    }

    #[tokio::test]
    async fn test_add_rejects_bad_time_and_foreign_owner() {
        let f = fixture().await;
        let err = f
            .service
            .add(&ctx("asha@example.com"), "Picnic", "1pm", None)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        let err = f
            .service
            .add(&ctx("asha@example.com"), "Picnic", "13:00", Some("ravi@example.com"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);
        assert!(f.tasks.is_empty());
    }

    #[tokio::test]
    async fn test_delete_checks_id_existence_and_owner() {
        let f = fixture().await;
        let added = f
            .service
            .add(&ctx("asha@example.com"), "Picnic", "13:00", None)
            .await
            .unwrap();
        let id = added.task.id.to_string();

        let err = f.service.delete(&ctx("asha@example.com"), "not-a-uuid").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        let unknown = TaskId::new().to_string();
        let err = f.service.delete(&ctx("asha@example.com"), &unknown).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);

        let err = f.service.delete(&ctx("ravi@example.com"), &id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);
        assert_eq!(f.tasks.len(), 1);

        f.service.delete(&ctx("asha@example.com"), &id).await.unwrap();
        assert!(f.tasks.is_empty());
    }
}
