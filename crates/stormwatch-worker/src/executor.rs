//! Job trait and error type.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;

use stormwatch_core::error::AppError;

/// A job the runner invokes on every tick.
#[async_trait]
pub trait ScheduledJob: Send + Sync + std::fmt::Debug {
    /// Stable name used in logs.
    fn name(&self) -> &str;

    /// Do one tick's worth of work and return a JSON summary.
    async fn run(&self, now: DateTime<Utc>) -> Result<Value, JobExecutionError>;
}

/// Error from job execution
#[derive(Debug, thiserror::Error)]
pub enum JobExecutionError {
    /// The next tick may succeed (store or provider outage)
    #[error("Transient job failure: {0}")]
    Transient(String),

    /// Misconfiguration; retrying will not help
    #[error("Permanent job failure: {0}")]
    Permanent(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(#[from] AppError),
}

impl JobExecutionError {
    /// Classify a store/provider error raised inside a job.
    pub fn from_app(err: AppError) -> Self {
        use stormwatch_core::error::ErrorKind;
        match err.kind {
            ErrorKind::Database | ErrorKind::Provider | ErrorKind::Messaging => {
                Self::Transient(err.to_string())
            }
            ErrorKind::Configuration => Self::Permanent(err.to_string()),
            _ => Self::Internal(err),
        }
    }
}
