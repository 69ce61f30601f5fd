//! # stormwatch-entity
//!
//! Domain entity models for Stormwatch. Every struct in this crate
//! represents a database table row or a domain value object. Row types
//! additionally derive `sqlx::FromRow`.

pub mod alert;
pub mod job;
pub mod mail;
pub mod task;
pub mod user;
