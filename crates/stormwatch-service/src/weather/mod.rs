//! Forecast classification and alert scheduling.

pub mod classifier;
pub mod scheduler;

pub use classifier::{Assessment, classify};
pub use scheduler::{AlertScheduler, ForecastWindow};
