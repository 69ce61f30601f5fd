//! Cron trigger for the job runner.

use std::sync::Arc;

use tokio::sync::watch;
use tokio_cron_scheduler::{Job as CronJob, JobScheduler};
use tracing;

use stormwatch_core::config::worker::WorkerConfig;
use stormwatch_core::error::AppError;

use crate::runner::JobRunner;

/// Fires [`JobRunner::run_once`] on the configured cron expression.
pub struct CronScheduler {
    scheduler: JobScheduler,
    runner: Arc<JobRunner>,
    tick_cron: String,
}

impl std::fmt::Debug for CronScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CronScheduler")
            .field("tick_cron", &self.tick_cron)
            .finish()
    }
}

impl CronScheduler {
    pub async fn new(runner: Arc<JobRunner>, config: &WorkerConfig) -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {}", e)))?;

        Ok(Self {
            scheduler,
            runner,
            tick_cron: config.tick_cron.clone(),
        })
    }

    /// Register the tick job. Fails on an invalid cron expression.
    pub async fn register(&self) -> Result<(), AppError> {
        let runner = Arc::clone(&self.runner);
        let job = CronJob::new_async(self.tick_cron.as_str(), move |_uuid, _lock| {
            let runner = Arc::clone(&runner);
            Box::pin(async move {
                let summary = runner.run_once().await;
                if summary.failed > 0 {
                    tracing::warn!(
                        succeeded = summary.succeeded,
                        failed = summary.failed,
                        "Worker tick finished with failures"
                    );
                } else {
                    tracing::trace!(succeeded = summary.succeeded, "Worker tick finished");
                }
            })
        })
        .map_err(|e| {
            AppError::configuration(format!(
                "Invalid worker tick schedule '{}': {}",
                self.tick_cron, e
            ))
        })?;

        self.scheduler
            .add(job)
            .await
            .map_err(|e| AppError::internal(format!("Failed to add worker tick: {}", e)))?;

        tracing::info!(
            "Registered worker tick ({}) for jobs {:?}",
            self.tick_cron,
            self.runner.job_names()
        );
        Ok(())
    }

    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {}", e)))?;

        tracing::info!("Cron scheduler started");
        Ok(())
    }

    pub async fn shutdown(&mut self) -> Result<(), AppError> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {}", e)))?;

        tracing::info!("Cron scheduler shut down");
        Ok(())
    }

    /// Register, start, and keep ticking until `cancel` turns true.
    pub async fn run_until(mut self, mut cancel: watch::Receiver<bool>) -> Result<(), AppError> {
        self.register().await?;
        self.start().await?;

        while !*cancel.borrow() {
            if cancel.changed().await.is_err() {
                break;
            }
        }

        tracing::info!("Worker received shutdown signal");
        self.shutdown().await
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use stormwatch_core::error::ErrorKind;
    use stormwatch_core::traits::FixedClock;

    use super::*;

    #[tokio::test]
    async fn test_rejects_invalid_cron() {
        let runner = Arc::new(JobRunner::new(Arc::new(FixedClock::utc(Utc::now()))));
        let config = WorkerConfig {
            tick_cron: "every minute".into(),
            ..WorkerConfig::default()
        };
        let scheduler = CronScheduler::new(runner, &config).await.unwrap();
        let err = scheduler.register().await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }
}
