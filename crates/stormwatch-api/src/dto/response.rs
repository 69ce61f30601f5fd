//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stormwatch_core::types::{AlertId, Coordinates, TaskId, UserId};
use stormwatch_entity::alert::Alert;
use stormwatch_entity::task::Task;
use stormwatch_entity::user::User;

/// Plain acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub message: String,
    /// Normalized email the code was sent to.
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationResponse {
    pub coordinates: Coordinates,
    pub place_name: String,
    pub last_updated: DateTime<Utc>,
}

/// Public user profile. Never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub location: Option<LocationResponse>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        let location = user.location().map(|l| LocationResponse {
            coordinates: l.coordinates,
            place_name: l.place_name,
            last_updated: l.last_updated,
        });
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            phone: user.phone,
            location,
        }
    }
}

/// Returned by verify and login.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub message: String,
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub email: String,
    pub user: UserResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskResponse {
    pub id: TaskId,
    pub time: String,
    pub task: String,
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            time: task.time,
            task: task.task,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskListResponse {
    pub tasks: Vec<TaskResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddTaskResponse {
    pub task: TaskResponse,
    /// Whether a weather alert was queued for the task.
    pub alert_scheduled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationCreatedResponse {
    pub message: String,
    pub notification_id: AlertId,
}

/// An alert as shown to its owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponse {
    pub id: AlertId,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub severity: String,
    pub location: String,
    pub description: String,
    pub source: String,
    pub delivered: bool,
    pub created_at: DateTime<Utc>,
    pub trigger_time: Option<DateTime<Utc>>,
}

impl From<Alert> for NotificationResponse {
    fn from(alert: Alert) -> Self {
        Self {
            id: alert.id,
            kind: alert.category.to_string(),
            title: alert.title,
            severity: alert.severity.to_string(),
            location: alert.location,
            description: alert.description,
            source: alert.source,
            delivered: alert.delivered,
            created_at: alert.created_at,
            trigger_time: alert.trigger_time,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationListResponse {
    pub notifications: Vec<NotificationResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}
