//! Delivery of due alerts by email, mail log and SMS.
//!
//! Per alert, in order: owner lookup, email, mail-log entry, SMS, then
//! `mark_delivered`. An email or mail-log failure leaves the alert pending
//! for the next tick. An SMS failure does not.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use stormwatch_core::result::AppResult;
use stormwatch_core::traits::{EmailMessage, EmailSender, SmsMessage, SmsSender};
use stormwatch_core::types::AlertId;
use stormwatch_database::store::{AlertStore, MailLogStore, UserStore};
use stormwatch_entity::alert::Alert;
use stormwatch_entity::mail::{CreateMailLogEntry, MailCategory};
use stormwatch_entity::user::User;
use stormwatch_service::templates::alert::{delivery_email_body, delivery_sms};

use super::outcome::ChannelOutcome;
use crate::executor::{JobExecutionError, ScheduledJob};

/// Outcome of delivering one alert.
#[derive(Debug, Clone, Serialize)]
pub struct AlertDelivery {
    pub alert_id: AlertId,
    pub user_email: String,
    pub email: ChannelOutcome,
    pub mail_log: ChannelOutcome,
    pub sms: ChannelOutcome,
    /// Whether this tick flipped the alert to delivered.
    pub marked_delivered: bool,
}

impl AlertDelivery {
    fn skipped_everywhere(alert: &Alert, reason: &str) -> Self {
        Self {
            alert_id: alert.id,
            user_email: alert.user_email.clone(),
            email: ChannelOutcome::skipped(reason),
            mail_log: ChannelOutcome::skipped(reason),
            sms: ChannelOutcome::skipped(reason),
            marked_delivered: false,
        }
    }
}

/// Result of one dispatcher tick.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DispatchReport {
    pub deliveries: Vec<AlertDelivery>,
}

impl DispatchReport {
    pub fn due(&self) -> usize {
        self.deliveries.len()
    }

    pub fn delivered(&self) -> usize {
        self.deliveries.iter().filter(|d| d.marked_delivered).count()
    }
}

/// Finds due alerts and delivers them.
#[derive(Debug, Clone)]
pub struct DeliveryDispatcher {
    alerts: Arc<dyn AlertStore>,
    users: Arc<dyn UserStore>,
    mail_log: Arc<dyn MailLogStore>,
    email: Arc<dyn EmailSender>,
    sms: Arc<dyn SmsSender>,
}

impl DeliveryDispatcher {
    pub fn new(
        alerts: Arc<dyn AlertStore>,
        users: Arc<dyn UserStore>,
        mail_log: Arc<dyn MailLogStore>,
        email: Arc<dyn EmailSender>,
        sms: Arc<dyn SmsSender>,
    ) -> Self {
        Self {
            alerts,
            users,
            mail_log,
            email,
            sms,
        }
    }

    /// Deliver every alert due at `now`, one after another.
    pub async fn tick(&self, now: DateTime<Utc>) -> AppResult<DispatchReport> {
        let due = self.alerts.find_due(now).await?;
        if due.is_empty() {
            return Ok(DispatchReport::default());
        }
        debug!(count = due.len(), "Dispatching due alerts");

        let mut report = DispatchReport::default();
        for alert in &due {
            let delivery = self.deliver(alert).await;
            info!(
                alert_id = %delivery.alert_id,
                user_email = %delivery.user_email,
                email = %delivery.email,
                mail_log = %delivery.mail_log,
                sms = %delivery.sms,
                delivered = delivery.marked_delivered,
                "Alert dispatch finished"
            );
            report.deliveries.push(delivery);
        }
        Ok(report)
    }

    async fn deliver(&self, alert: &Alert) -> AlertDelivery {
        let owner = match self.users.find_by_email(&alert.user_email).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                debug!(alert_id = %alert.id, user_email = %alert.user_email, "Alert owner not found");
                return AlertDelivery::skipped_everywhere(alert, "owner not found");
            }
            Err(e) => {
                warn!(alert_id = %alert.id, error = %e, "Owner lookup failed");
                return AlertDelivery::skipped_everywhere(alert, "owner lookup failed");
            }
        };

        let body = delivery_email_body(alert);
        let message = EmailMessage::plain(&owner.email, &alert.title, &body);
        if let Err(e) = self.email.send(&message).await {
            warn!(alert_id = %alert.id, user_email = %owner.email, error = %e, "Alert email failed");
            return AlertDelivery {
                email: ChannelOutcome::failed(&e),
                mail_log: ChannelOutcome::skipped("email not sent"),
                sms: ChannelOutcome::skipped("email not sent"),
                ..AlertDelivery::skipped_everywhere(alert, "")
            };
        }

        let mail_log = self.record_mail(alert, &owner, body).await;
        if mail_log.is_failed() {
            return AlertDelivery {
                email: ChannelOutcome::Delivered,
                mail_log,
                sms: ChannelOutcome::skipped("mail log not written"),
                ..AlertDelivery::skipped_everywhere(alert, "")
            };
        }
        let sms = self.send_sms(alert, &owner).await;

        let marked_delivered = match self.alerts.mark_delivered(alert.id).await {
            Ok(true) => true,
            Ok(false) => {
                warn!(alert_id = %alert.id, "Alert was already delivered");
                false
            }
            Err(e) => {
                warn!(alert_id = %alert.id, error = %e, "Failed to mark alert delivered");
                false
            }
        };

        AlertDelivery {
            alert_id: alert.id,
            user_email: alert.user_email.clone(),
            email: ChannelOutcome::Delivered,
            mail_log,
            sms,
            marked_delivered,
        }
    }

    async fn record_mail(&self, alert: &Alert, owner: &User, content: String) -> ChannelOutcome {
        let entry = CreateMailLogEntry {
            user_email: owner.email.clone(),
            subject: alert.title.clone(),
            content,
            category: MailCategory::from(alert.category),
        };
        match self.mail_log.append(entry).await {
            Ok(_) => ChannelOutcome::Delivered,
            Err(e) => {
                warn!(alert_id = %alert.id, error = %e, "Mail log write failed");
                ChannelOutcome::failed(e)
            }
        }
    }

    async fn send_sms(&self, alert: &Alert, owner: &User) -> ChannelOutcome {
        if owner.phone.trim().is_empty() {
            return ChannelOutcome::skipped("no phone number");
        }
        match self
            .sms
            .send(&SmsMessage::new(&owner.phone, delivery_sms(alert)))
            .await
        {
            Ok(()) => ChannelOutcome::Delivered,
            Err(e) => {
                warn!(alert_id = %alert.id, user_email = %owner.email, error = %e, "Alert SMS failed");
                ChannelOutcome::failed(e)
            }
        }
    }
}

#[async_trait]
impl ScheduledJob for DeliveryDispatcher {
    fn name(&self) -> &str {
        "alert_dispatch"
    }

    async fn run(&self, now: DateTime<Utc>) -> Result<Value, JobExecutionError> {
        let report = self.tick(now).await.map_err(JobExecutionError::from_app)?;
        Ok(serde_json::json!({
            "task": self.name(),
            "due": report.due(),
            "delivered": report.delivered(),
        }))
    }
}
