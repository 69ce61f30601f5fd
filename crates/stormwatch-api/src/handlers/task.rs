//! Task handlers.

use axum::Json;
use axum::extract::{Path, State};

use crate::dto::request::AddTaskRequest;
use crate::dto::response::{AddTaskResponse, MessageResponse, TaskListResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, ValidatedJson};
use crate::state::AppState;

/// GET /api/tasks
pub async fn list_tasks(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<TaskListResponse>, ApiError> {
    let tasks = state.tasks.list(auth.context()).await?;
    Ok(Json(TaskListResponse {
        tasks: tasks.into_iter().map(Into::into).collect(),
    }))
}

/// POST /api/add_task
pub async fn add_task(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<AddTaskRequest>,
) -> Result<Json<AddTaskResponse>, ApiError> {
    let added = state
        .tasks
        .add(auth.context(), &req.task, &req.time, req.user_email.as_deref())
        .await?;
    Ok(Json(AddTaskResponse {
        task: added.task.into(),
        alert_scheduled: added.alert_scheduled,
    }))
}

/// DELETE /api/tasks/{id}
///
/// The id is taken as a raw string so a malformed one maps to 400 through
/// the service rather than axum's path rejection.
pub async fn delete_task(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.tasks.delete(auth.context(), &id).await?;
    Ok(Json(MessageResponse::new("Task deleted successfully")))
}
