//! Task domain entities.

pub mod model;
pub mod time_of_day;

pub use model::{CreateTask, Task};
pub use time_of_day::TimeOfDay;
