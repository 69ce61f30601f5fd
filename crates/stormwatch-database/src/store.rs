//! Store traits.
//!
//! Services and jobs only see these traits, so storage is swappable between
//! PostgreSQL ([`crate::repositories`]) and memory ([`crate::memory`]).

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use stormwatch_core::result::AppResult;
use stormwatch_core::types::{AlertId, TaskId, UserId};
use stormwatch_entity::alert::{Alert, CreateAlert};
use stormwatch_entity::mail::{CreateMailLogEntry, MailLogEntry};
use stormwatch_entity::task::{CreateTask, Task};
use stormwatch_entity::user::{CreateUser, User, UserLocation};

use crate::memory::{
    MemoryAlertStore, MemoryJobMarkerStore, MemoryMailLogStore, MemoryTaskStore, MemoryUserStore,
};

/// Account persistence.
#[async_trait]
pub trait UserStore: Send + Sync + std::fmt::Debug + 'static {
    /// Case-insensitive lookup by email.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Lookup by email (case-insensitive) or exact phone number.
    async fn find_by_identifier(&self, identifier: &str) -> AppResult<Option<User>>;

    /// Whether any account already uses this email or phone.
    async fn exists_by_email_or_phone(&self, email: &str, phone: &str) -> AppResult<bool>;

    /// Insert a new account. Fails with `Conflict` on a duplicate email.
    async fn create(&self, input: CreateUser) -> AppResult<User>;

    /// Replace the stored location.
    async fn update_location(&self, id: UserId, location: &UserLocation) -> AppResult<()>;

    /// All verified accounts, oldest first.
    async fn list_verified(&self) -> AppResult<Vec<User>>;
}

/// Task persistence.
#[async_trait]
pub trait TaskStore: Send + Sync + std::fmt::Debug + 'static {
    async fn create(&self, input: CreateTask) -> AppResult<Task>;

    async fn find_by_id(&self, id: TaskId) -> AppResult<Option<Task>>;

    /// Tasks owned by `email`, in creation order.
    async fn list_for_user(&self, email: &str) -> AppResult<Vec<Task>>;

    /// Returns `true` if a row was removed.
    async fn delete(&self, id: TaskId) -> AppResult<bool>;
}

/// Alert persistence. The dispatcher is the only caller of
/// [`AlertStore::mark_delivered`].
#[async_trait]
pub trait AlertStore: Send + Sync + std::fmt::Debug + 'static {
    async fn create(&self, input: CreateAlert) -> AppResult<Alert>;

    /// Undelivered alerts whose trigger time is at or before `now`,
    /// earliest trigger first.
    async fn find_due(&self, now: DateTime<Utc>) -> AppResult<Vec<Alert>>;

    /// Flip `delivered` to true. Returns `false` if the alert was unknown
    /// or already delivered.
    async fn mark_delivered(&self, id: AlertId) -> AppResult<bool>;

    /// Alerts owned by `email`, newest first.
    async fn list_for_user(&self, email: &str) -> AppResult<Vec<Alert>>;
}

/// Append-only mail audit log.
#[async_trait]
pub trait MailLogStore: Send + Sync + std::fmt::Debug + 'static {
    async fn append(&self, entry: CreateMailLogEntry) -> AppResult<MailLogEntry>;

    /// Entries for `email`, newest first.
    async fn list_for_user(&self, email: &str) -> AppResult<Vec<MailLogEntry>>;
}

/// Per-job last-run dates.
#[async_trait]
pub trait JobMarkerStore: Send + Sync + std::fmt::Debug + 'static {
    async fn last_run(&self, job_name: &str) -> AppResult<Option<NaiveDate>>;

    async fn record_run(&self, job_name: &str, date: NaiveDate) -> AppResult<()>;
}

/// One handle per store, as handed to services and jobs.
#[derive(Debug, Clone)]
pub struct Stores {
    pub users: Arc<dyn UserStore>,
    pub tasks: Arc<dyn TaskStore>,
    pub alerts: Arc<dyn AlertStore>,
    pub mail_log: Arc<dyn MailLogStore>,
    pub job_markers: Arc<dyn JobMarkerStore>,
}

impl Stores {
    /// Fresh in-memory stores. Nothing survives a restart.
    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(MemoryUserStore::new()),
            tasks: Arc::new(MemoryTaskStore::new()),
            alerts: Arc::new(MemoryAlertStore::new()),
            mail_log: Arc::new(MemoryMailLogStore::new()),
            job_markers: Arc::new(MemoryJobMarkerStore::new()),
        }
    }
}
