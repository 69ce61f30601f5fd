//! # stormwatch-core
//!
//! Core crate for Stormwatch. Contains configuration schemas, typed
//! identifiers, weather value types, provider traits and the unified
//! error system.
//!
//! This crate has **no** internal dependencies on other Stormwatch crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
