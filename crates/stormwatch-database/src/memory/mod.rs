//! In-memory store implementations backed by `dashmap`.
//!
//! Semantics match the PostgreSQL repositories, including case-insensitive
//! email matching and `Conflict` on duplicate emails. Nothing survives a
//! restart.

mod alert;
mod job_marker;
mod mail_log;
mod task;
mod user;

pub use alert::MemoryAlertStore;
pub use job_marker::MemoryJobMarkerStore;
pub use mail_log::MemoryMailLogStore;
pub use task::MemoryTaskStore;
pub use user::MemoryUserStore;
