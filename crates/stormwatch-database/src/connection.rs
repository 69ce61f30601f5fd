//! PostgreSQL pool and the store set built on top of it.

use std::sync::Arc;

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

use stormwatch_core::config::database::DatabaseConfig;
use stormwatch_core::error::{AppError, ErrorKind};

use crate::repositories::{
    AlertRepository, JobMarkerRepository, MailLogRepository, TaskRepository, UserRepository,
};
use crate::store::Stores;

#[derive(Debug, Clone)]
pub struct DatabasePool {
    pool: PgPool,
}

impl DatabasePool {
    /// Open the pool. Fails fast when the server is unreachable.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, AppError> {
        if config.url.trim().is_empty() {
            return Err(AppError::configuration("database.url is not set"));
        }
        info!(
            url = %config.redacted_url(),
            max_connections = config.max_connections,
            "Connecting to PostgreSQL"
        );

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.acquire_timeout())
            .idle_timeout(config.idle_timeout())
            .connect(&config.url)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Could not reach PostgreSQL", e)
            })?;

        info!("PostgreSQL pool ready");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// PostgreSQL-backed stores sharing this pool.
    pub fn stores(&self) -> Stores {
        let pool = &self.pool;
        Stores {
            users: Arc::new(UserRepository::new(pool.clone())),
            tasks: Arc::new(TaskRepository::new(pool.clone())),
            alerts: Arc::new(AlertRepository::new(pool.clone())),
            mail_log: Arc::new(MailLogRepository::new(pool.clone())),
            job_markers: Arc::new(JobMarkerRepository::new(pool.clone())),
        }
    }

    /// Wait for checked-out connections to return, then close them.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("PostgreSQL pool closed");
    }
}
