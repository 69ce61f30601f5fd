//! Email channel implementations.

mod smtp;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use stormwatch_core::config::messaging::SmtpConfig;
use stormwatch_core::result::AppResult;
use stormwatch_core::traits::{EmailMessage, EmailSender};

pub use smtp::SmtpEmailSender;

/// Pick the SMTP relay when enabled, otherwise the logging sender.
pub fn build_email_sender(config: &SmtpConfig) -> AppResult<Arc<dyn EmailSender>> {
    if config.enabled {
        Ok(Arc::new(SmtpEmailSender::new(config)?))
    } else {
        info!("SMTP disabled, emails will only be logged");
        Ok(Arc::new(LogEmailSender))
    }
}

/// Writes emails to the log instead of sending them.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogEmailSender;

#[async_trait]
impl EmailSender for LogEmailSender {
    async fn send(&self, message: &EmailMessage) -> AppResult<()> {
        info!(
            to = %message.to,
            subject = %message.subject,
            has_html = message.html.is_some(),
            "Email (not sent, SMTP disabled)"
        );
        Ok(())
    }
}
