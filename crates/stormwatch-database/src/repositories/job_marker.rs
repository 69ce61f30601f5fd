//! Job run marker repository implementation.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;

use stormwatch_core::error::{AppError, ErrorKind};
use stormwatch_core::result::AppResult;
use stormwatch_entity::job::JobRunMarker;

use crate::store::JobMarkerStore;

#[derive(Debug, Clone)]
pub struct JobMarkerRepository {
    pool: PgPool,
}

impl JobMarkerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobMarkerStore for JobMarkerRepository {
    async fn last_run(&self, job_name: &str) -> AppResult<Option<NaiveDate>> {
        let marker =
            sqlx::query_as::<_, JobRunMarker>("SELECT * FROM job_runs WHERE job_name = $1")
                .bind(job_name)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to read job marker", e)
                })?;
        Ok(marker.map(|m| m.last_run_date))
    }

    async fn record_run(&self, job_name: &str, date: NaiveDate) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO job_runs (job_name, last_run_date, updated_at) VALUES ($1, $2, NOW()) \
             ON CONFLICT (job_name) DO UPDATE SET last_run_date = $2, updated_at = NOW()",
        )
        .bind(job_name)
        .bind(date)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to record job run", e))?;
        Ok(())
    }
}
