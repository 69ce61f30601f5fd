//! User domain entities.

pub mod model;

pub use model::{CreateUser, FALLBACK_PLACE, User, UserLocation};
