//! Creation and listing of alerts on behalf of API clients.

use std::sync::Arc;

use tracing::info;

use stormwatch_core::error::AppError;
use stormwatch_core::result::AppResult;
use stormwatch_core::traits::Clock;
use stormwatch_database::store::AlertStore;
use stormwatch_entity::alert::{Alert, AlertCategory, CreateAlert, Severity};
use stormwatch_entity::user::FALLBACK_PLACE;

use crate::context::RequestContext;

const DEFAULT_SOURCE: &str = "System";

/// A client-submitted notification, fields as received.
#[derive(Debug, Clone, Default)]
pub struct NewNotification {
    pub user_email: String,
    /// Alert category name (`flood`, `cyclone`, ...).
    pub kind: String,
    pub title: String,
    pub description: String,
    pub severity: Option<String>,
    pub location: Option<String>,
    pub source: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Stores ad-hoc alerts for immediate dispatch and lists a user's alerts.
#[derive(Debug, Clone)]
pub struct NotificationService {
    alerts: Arc<dyn AlertStore>,
    clock: Arc<dyn Clock>,
}

impl NotificationService {
    pub fn new(alerts: Arc<dyn AlertStore>, clock: Arc<dyn Clock>) -> Self {
        Self { alerts, clock }
    }

    /// Queue an alert for the caller. It becomes due immediately and is
    /// delivered by the next dispatcher tick.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        input: NewNotification,
    ) -> AppResult<Alert> {
        if input.user_email.trim().is_empty()
            || input.kind.trim().is_empty()
            || input.title.trim().is_empty()
            || input.description.trim().is_empty()
        {
            return Err(AppError::validation(
                "userEmail, type, title and description are required",
            ));
        }
        let category: AlertCategory = input.kind.trim().parse()?;
        let severity = match non_blank(input.severity) {
            Some(s) => s.trim().parse()?,
            None => Severity::Medium,
        };
        ctx.ensure_owner(&input.user_email)?;

        let alert = self
            .alerts
            .create(CreateAlert {
                user_email: ctx.email.clone(),
                category,
                title: input.title.trim().to_string(),
                severity,
                location: non_blank(input.location).unwrap_or_else(|| FALLBACK_PLACE.to_string()),
                description: input.description,
                source: non_blank(input.source).unwrap_or_else(|| DEFAULT_SOURCE.to_string()),
                trigger_time: Some(self.clock.now()),
            })
            .await?;

        info!(
            alert_id = %alert.id,
            user_email = %alert.user_email,
            category = %alert.category,
            "Notification queued"
        );
        Ok(alert)
    }

    /// The caller's alerts, newest first.
    pub async fn list(&self, ctx: &RequestContext) -> AppResult<Vec<Alert>> {
        self.alerts.list_for_user(&ctx.email).await
    }
}
