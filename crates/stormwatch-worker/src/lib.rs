//! Background jobs for Stormwatch.
//!
//! This crate provides:
//! - the [`ScheduledJob`] trait every periodic job implements
//! - the alert [`DeliveryDispatcher`] and the [`DailyDigestJob`]
//! - a [`JobRunner`] that runs all jobs sequentially, never overlapping
//! - a [`CronScheduler`] that fires the runner on a cron expression

pub mod executor;
pub mod jobs;
pub mod runner;
pub mod scheduler;

pub use executor::{JobExecutionError, ScheduledJob};
pub use jobs::{
    AlertDelivery, ChannelOutcome, DailyDigestJob, DeliveryDispatcher, DigestDelivery,
    DigestReport, DispatchReport,
};
pub use runner::{JobRunner, TickSummary};
pub use scheduler::CronScheduler;
