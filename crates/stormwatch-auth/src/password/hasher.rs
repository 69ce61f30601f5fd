//! Argon2id password hashing.
//!
//! Stored hashes are PHC strings (`$argon2id$v=19$...`), so parameters can
//! change later without invalidating existing accounts.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{self, PasswordHash, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};

use stormwatch_core::error::AppError;

#[derive(Debug, Clone)]
pub struct PasswordHasher {
    argon: Argon2<'static>,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasher {
    pub fn new() -> Self {
        Self {
            argon: Argon2::new(Algorithm::Argon2id, Version::V0x13, Params::default()),
        }
    }

    /// Salted PHC hash of `password`.
    pub fn hash_password(&self, password: &str) -> Result<String, AppError> {
        use argon2::PasswordHasher as _;

        let salt = SaltString::generate(&mut OsRng);
        self.argon
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::internal(format!("Could not hash password: {e}")))
    }

    /// `Ok(false)` on a wrong password; `Err` only when `stored` is not a
    /// valid PHC string.
    pub fn verify_password(&self, password: &str, stored: &str) -> Result<bool, AppError> {
        let stored = PasswordHash::new(stored)
            .map_err(|e| AppError::internal(format!("Stored password hash is corrupt: {e}")))?;

        match self.argon.verify_password(password.as_bytes(), &stored) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AppError::internal(format!("Could not verify password: {e}"))),
        }
    }
}
