//! Ad-hoc hazard notifications.

pub mod service;

pub use service::{NewNotification, NotificationService};
