//! Ad-hoc notification handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use stormwatch_service::NewNotification;

use crate::dto::request::CreateNotificationRequest;
use crate::dto::response::{NotificationCreatedResponse, NotificationListResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, ValidatedJson};
use crate::state::AppState;

/// POST /api/notifications
pub async fn create_notification(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateNotificationRequest>,
) -> Result<(StatusCode, Json<NotificationCreatedResponse>), ApiError> {
    let alert = state
        .notifications
        .create(
            auth.context(),
            NewNotification {
                user_email: req.user_email,
                kind: req.kind,
                title: req.title,
                description: req.description,
                severity: req.severity,
                location: req.location,
                source: req.source,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(NotificationCreatedResponse {
            message: "Notification created successfully".to_string(),
            notification_id: alert.id,
        }),
    ))
}

/// GET /api/user/notifications
pub async fn list_notifications(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<NotificationListResponse>, ApiError> {
    let alerts = state.notifications.list(auth.context()).await?;
    Ok(Json(NotificationListResponse {
        notifications: alerts.into_iter().map(Into::into).collect(),
    }))
}
