//! Embedded schema migrations.

use sqlx::migrate::Migrator;
use tracing::info;

use stormwatch_core::error::{AppError, ErrorKind};
use stormwatch_core::result::AppResult;

use crate::connection::DatabasePool;

static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Apply every pending migration from `migrations/`.
pub async fn run_migrations(db: &DatabasePool) -> AppResult<()> {
    info!(known = MIGRATOR.iter().count(), "Applying schema migrations");

    MIGRATOR.run(db.pool()).await.map_err(|e| {
        AppError::with_source(
            ErrorKind::Database,
            format!("Failed to run migrations: {e}"),
            e,
        )
    })?;

    info!("Schema is up to date");
    Ok(())
}
