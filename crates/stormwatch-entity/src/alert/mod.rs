//! Alert domain entities.
//!
//! Alerts are exposed to API clients under the name "notification".

pub mod category;
pub mod model;
pub mod severity;

pub use category::AlertCategory;
pub use model::{Alert, CreateAlert};
pub use severity::Severity;
