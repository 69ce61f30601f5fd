//! Mail log entry: a write-once copy of a delivered message.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

use stormwatch_core::types::MailLogId;

use crate::alert::AlertCategory;

/// Category recorded on a mail log entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "mail_category", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MailCategory {
    Weather,
    Task,
    #[default]
    System,
}

impl MailCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weather => "weather",
            Self::Task => "task",
            Self::System => "system",
        }
    }
}

impl fmt::Display for MailCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<AlertCategory> for MailCategory {
    fn from(category: AlertCategory) -> Self {
        match category {
            AlertCategory::Weather => Self::Weather,
            _ => Self::System,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MailLogEntry {
    pub id: MailLogId,
    pub user_email: String,
    pub subject: String,
    pub content: String,
    pub sent_at: DateTime<Utc>,
    pub category: MailCategory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMailLogEntry {
    pub user_email: String,
    pub subject: String,
    pub content: String,
    pub category: MailCategory,
}

impl CreateMailLogEntry {
    pub fn into_entry(self, sent_at: DateTime<Utc>) -> MailLogEntry {
        MailLogEntry {
            id: MailLogId::new(),
            user_email: self.user_email,
            subject: self.subject,
            content: self.content,
            sent_at,
            category: self.category,
        }
    }
}
