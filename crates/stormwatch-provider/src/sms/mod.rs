//! SMS channel implementations.

mod fast2sms;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use stormwatch_core::config::messaging::SmsConfig;
use stormwatch_core::result::AppResult;
use stormwatch_core::traits::{SmsMessage, SmsSender};

pub use fast2sms::Fast2SmsSender;

/// Pick the Fast2SMS gateway when enabled, otherwise the logging sender.
pub fn build_sms_sender(config: &SmsConfig) -> AppResult<Arc<dyn SmsSender>> {
    if config.enabled {
        Ok(Arc::new(Fast2SmsSender::new(config)?))
    } else {
        info!("SMS gateway disabled, messages will only be logged");
        Ok(Arc::new(LogSmsSender))
    }
}

/// Writes SMS messages to the log instead of sending them.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSmsSender;

#[async_trait]
impl SmsSender for LogSmsSender {
    async fn send(&self, message: &SmsMessage) -> AppResult<()> {
        info!(to = %message.to, chars = message.body.chars().count(), "SMS (not sent, gateway disabled)");
        Ok(())
    }
}
