//! User repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use stormwatch_core::error::{AppError, ErrorKind};
use stormwatch_core::result::AppResult;
use stormwatch_core::types::UserId;
use stormwatch_entity::user::{CreateUser, User, UserLocation};

use crate::store::UserStore;

/// Repository for user accounts.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE LOWER(email) = LOWER($1)")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find user by email", e)
            })
    }

    async fn find_by_identifier(&self, identifier: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE LOWER(email) = LOWER($1) OR phone = $1 \
             ORDER BY created_at LIMIT 1",
        )
        .bind(identifier)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find user by identifier", e)
        })
    }

    async fn exists_by_email_or_phone(&self, email: &str, phone: &str) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE LOWER(email) = LOWER($1) OR phone = $2)",
        )
        .bind(email)
        .bind(phone)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to check user exists", e))
    }

    async fn create(&self, input: CreateUser) -> AppResult<User> {
        let location = input.location.as_ref();
        sqlx::query_as::<_, User>(
            "INSERT INTO users (id, name, email, phone, password_hash, is_verified, \
             location_lat, location_lon, place_name, location_updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING *",
        )
        .bind(UserId::new())
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.password_hash)
        .bind(input.is_verified)
        .bind(location.map(|l| l.coordinates.lat))
        .bind(location.map(|l| l.coordinates.lon))
        .bind(location.map(|l| l.place_name.clone()))
        .bind(location.map(|l| l.last_updated))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| super::insert_error(e, "User"))
    }

    async fn update_location(&self, id: UserId, location: &UserLocation) -> AppResult<()> {
        sqlx::query(
            "UPDATE users SET location_lat = $2, location_lon = $3, place_name = $4, \
             location_updated_at = $5 WHERE id = $1",
        )
        .bind(id)
        .bind(location.coordinates.lat)
        .bind(location.coordinates.lon)
        .bind(&location.place_name)
        .bind(location.last_updated)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update location", e))?;
        Ok(())
    }

    async fn list_verified(&self) -> AppResult<Vec<User>> {
        sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE is_verified = TRUE ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list verified users", e)
        })
    }
}
