//! Alert repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use stormwatch_core::error::{AppError, ErrorKind};
use stormwatch_core::result::AppResult;
use stormwatch_core::types::AlertId;
use stormwatch_entity::alert::{Alert, CreateAlert};

use crate::store::AlertStore;

/// Repository for pending and delivered alerts.
#[derive(Debug, Clone)]
pub struct AlertRepository {
    pool: PgPool,
}

impl AlertRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AlertStore for AlertRepository {
    async fn create(&self, input: CreateAlert) -> AppResult<Alert> {
        sqlx::query_as::<_, Alert>(
            "INSERT INTO alerts (id, user_email, category, title, severity, location, \
             description, source, trigger_time) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING *",
        )
        .bind(AlertId::new())
        .bind(&input.user_email)
        .bind(input.category)
        .bind(&input.title)
        .bind(input.severity)
        .bind(&input.location)
        .bind(&input.description)
        .bind(&input.source)
        .bind(input.trigger_time)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| super::insert_error(e, "Alert"))
    }

    async fn find_due(&self, now: DateTime<Utc>) -> AppResult<Vec<Alert>> {
        sqlx::query_as::<_, Alert>(
            "SELECT * FROM alerts WHERE trigger_time <= $1 AND delivered = FALSE \
             ORDER BY trigger_time",
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find due alerts", e))
    }

    async fn mark_delivered(&self, id: AlertId) -> AppResult<bool> {
        let result =
            sqlx::query("UPDATE alerts SET delivered = TRUE WHERE id = $1 AND delivered = FALSE")
                .bind(id)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to mark alert delivered", e)
                })?;
        Ok(result.rows_affected() == 1)
    }

    async fn list_for_user(&self, email: &str) -> AppResult<Vec<Alert>> {
        sqlx::query_as::<_, Alert>(
            "SELECT * FROM alerts WHERE user_email = $1 ORDER BY created_at DESC",
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list alerts", e))
    }
}
