//! Mail log repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use stormwatch_core::error::{AppError, ErrorKind};
use stormwatch_core::result::AppResult;
use stormwatch_core::types::MailLogId;
use stormwatch_entity::mail::{CreateMailLogEntry, MailLogEntry};

use crate::store::MailLogStore;

#[derive(Debug, Clone)]
pub struct MailLogRepository {
    pool: PgPool,
}

impl MailLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MailLogStore for MailLogRepository {
    async fn append(&self, entry: CreateMailLogEntry) -> AppResult<MailLogEntry> {
        sqlx::query_as::<_, MailLogEntry>(
            "INSERT INTO mail_log (id, user_email, subject, content, category) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(MailLogId::new())
        .bind(&entry.user_email)
        .bind(&entry.subject)
        .bind(&entry.content)
        .bind(entry.category)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| super::insert_error(e, "Mail log entry"))
    }

    async fn list_for_user(&self, email: &str) -> AppResult<Vec<MailLogEntry>> {
        sqlx::query_as::<_, MailLogEntry>(
            "SELECT * FROM mail_log WHERE user_email = $1 ORDER BY sent_at DESC",
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list mail log", e))
    }
}
