//! Task repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use stormwatch_core::error::{AppError, ErrorKind};
use stormwatch_core::result::AppResult;
use stormwatch_core::types::TaskId;
use stormwatch_entity::task::{CreateTask, Task};

use crate::store::TaskStore;

/// Repository for scheduled tasks.
#[derive(Debug, Clone)]
pub struct TaskRepository {
    pool: PgPool,
}

impl TaskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskStore for TaskRepository {
    async fn create(&self, input: CreateTask) -> AppResult<Task> {
        sqlx::query_as::<_, Task>(
            "INSERT INTO tasks (id, user_email, task, time) VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(TaskId::new())
        .bind(&input.user_email)
        .bind(&input.task)
        .bind(&input.time)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| super::insert_error(e, "Task"))
    }

    async fn find_by_id(&self, id: TaskId) -> AppResult<Option<Task>> {
        sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find task", e))
    }

    async fn list_for_user(&self, email: &str) -> AppResult<Vec<Task>> {
        sqlx::query_as::<_, Task>(
            "SELECT * FROM tasks WHERE user_email = $1 ORDER BY created_at",
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list tasks", e))
    }

    async fn delete(&self, id: TaskId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete task", e))?;
        Ok(result.rows_affected() > 0)
    }
}
