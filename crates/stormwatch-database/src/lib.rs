//! # stormwatch-database
//!
//! Persistence for Stormwatch: the store traits every service depends on,
//! their PostgreSQL implementations, and in-memory implementations used by
//! tests and local runs without a database.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use store::{AlertStore, JobMarkerStore, MailLogStore, Stores, TaskStore, UserStore};
