//! Mail log entities.

pub mod model;

pub use model::{CreateMailLogEntry, MailCategory, MailLogEntry};
