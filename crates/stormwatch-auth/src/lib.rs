//! # stormwatch-auth
//!
//! Authentication primitives for Stormwatch.
//!
//! ## Modules
//!
//! - `jwt`: bearer token issuance and validation (subject = email)
//! - `password`: Argon2id hashing and the length policy
//! - `otp`: six-digit verification codes
//! - `pending`: registrations awaiting code confirmation

pub mod jwt;
pub mod otp;
pub mod password;
pub mod pending;

pub use jwt::{Claims, IssuedToken, JwtDecoder, JwtEncoder};
pub use password::{PasswordHasher, PasswordValidator};
pub use pending::{PendingRegistration, PendingRegistrations};
