//! PostgreSQL implementations of the store traits.

pub mod alert;
pub mod job_marker;
pub mod mail_log;
pub mod task;
pub mod user;

pub use alert::AlertRepository;
pub use job_marker::JobMarkerRepository;
pub use mail_log::MailLogRepository;
pub use task::TaskRepository;
pub use user::UserRepository;

use stormwatch_core::error::{AppError, ErrorKind};

/// Map an insert failure, turning unique violations into `Conflict`.
pub(crate) fn insert_error(e: sqlx::Error, what: &str) -> AppError {
    let unique_violation = e
        .as_database_error()
        .and_then(|db| db.code())
        .is_some_and(|code| code == "23505");
    if unique_violation {
        AppError::with_source(ErrorKind::Conflict, format!("{what} already exists"), e)
    } else {
        AppError::with_source(ErrorKind::Database, format!("Failed to create {what}"), e)
    }
}
