//! Registration, verification and login.

pub mod service;

pub use service::{AccountService, AuthSession, Registration};
