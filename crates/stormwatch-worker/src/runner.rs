//! Job runner: executes every registered job once per tick, in order.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing;

use stormwatch_core::traits::Clock;

use crate::executor::{JobExecutionError, ScheduledJob};

/// Runs the registered jobs sequentially.
///
/// An async gate serializes ticks: a tick that fires while the previous one
/// is still running waits for it instead of overlapping.
#[derive(Debug)]
pub struct JobRunner {
    jobs: Vec<Arc<dyn ScheduledJob>>,
    clock: Arc<dyn Clock>,
    gate: Mutex<()>,
}

/// How one tick went, for logging and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickSummary {
    pub succeeded: usize,
    pub failed: usize,
}

impl JobRunner {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            jobs: Vec::new(),
            clock,
            gate: Mutex::new(()),
        }
    }

    /// Append a job. Jobs run in registration order.
    pub fn with_job(mut self, job: Arc<dyn ScheduledJob>) -> Self {
        self.jobs.push(job);
        self
    }

    pub fn job_names(&self) -> Vec<&str> {
        self.jobs.iter().map(|j| j.name()).collect()
    }

    /// Run every job once. A failing job is logged and does not stop the
    /// ones after it.
    pub async fn run_once(&self) -> TickSummary {
        let _guard = self.gate.lock().await;
        let now = self.clock.now();
        let mut summary = TickSummary::default();

        for job in &self.jobs {
            match job.run(now).await {
                Ok(result) => {
                    summary.succeeded += 1;
                    tracing::debug!(job = job.name(), %result, "Job tick completed");
                }
                Err(JobExecutionError::Transient(msg)) => {
                    summary.failed += 1;
                    tracing::warn!(job = job.name(), "Job tick failed, will retry next tick: {}", msg);
                }
                Err(JobExecutionError::Permanent(msg)) => {
                    summary.failed += 1;
                    tracing::error!(job = job.name(), "Job tick failed permanently: {}", msg);
                }
                Err(JobExecutionError::Internal(err)) => {
                    summary.failed += 1;
                    tracing::error!(job = job.name(), "Job internal error: {}", err);
                }
            }
        }
        summary
    }
}
