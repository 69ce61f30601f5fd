//! Task entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use stormwatch_core::types::TaskId;

/// A user's planned activity at a wall-clock time of day.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: TaskId,
    /// Owner email.
    pub user_email: String,
    /// Free-text description.
    pub task: String,
    /// `HH:MM`, as submitted.
    pub time: String,
    pub created_at: DateTime<Utc>,
}

impl Task {
    pub fn is_owned_by(&self, email: &str) -> bool {
        self.user_email == email
    }
}

/// Data required to create a task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    pub user_email: String,
    pub task: String,
    pub time: String,
}

impl CreateTask {
    pub fn into_task(self, created_at: DateTime<Utc>) -> Task {
        Task {
            id: TaskId::new(),
            user_email: self.user_email,
            task: self.task,
            time: self.time,
            created_at,
        }
    }
}
