//! Task management.

pub mod service;

pub use service::{AddedTask, TaskService};
