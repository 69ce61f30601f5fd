//! Fast2SMS bulk API sender.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use stormwatch_core::config::messaging::SmsConfig;
use stormwatch_core::error::{AppError, ErrorKind};
use stormwatch_core::result::AppResult;
use stormwatch_core::traits::{SmsMessage, SmsSender};

use crate::http;

/// Quick transactional route.
const ROUTE: &str = "q";

#[derive(Clone)]
pub struct Fast2SmsSender {
    client: Client,
    api_url: String,
    api_key: String,
    sender_id: String,
}

impl std::fmt::Debug for Fast2SmsSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fast2SmsSender")
            .field("api_url", &self.api_url)
            .field("sender_id", &self.sender_id)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Serialize)]
struct BulkRequest<'a> {
    route: &'a str,
    sender_id: &'a str,
    numbers: &'a str,
    message: &'a str,
    flash: u8,
    language: &'a str,
}

impl Fast2SmsSender {
    pub fn new(config: &SmsConfig) -> AppResult<Self> {
        if config.api_key.is_empty() {
            return Err(AppError::configuration(
                "messaging.sms.api_key is required when SMS is enabled",
            ));
        }
        Ok(Self {
            client: http::client(config.timeout_seconds, ErrorKind::Messaging)?,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            sender_id: config.sender_id.clone(),
        })
    }
}

#[async_trait]
impl SmsSender for Fast2SmsSender {
    async fn send(&self, message: &SmsMessage) -> AppResult<()> {
        let request = BulkRequest {
            route: ROUTE,
            sender_id: &self.sender_id,
            numbers: &message.to,
            message: &message.body,
            flash: 0,
            language: "english",
        };

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Messaging,
                    format!("SMS request to {} failed", message.to),
                    e,
                )
            })?;
        http::ensure_success(response, "Fast2SMS", ErrorKind::Messaging).await?;

        debug!(to = %message.to, "SMS sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enabled_without_key_is_rejected() {
        let config = SmsConfig {
            enabled: true,
            ..SmsConfig::default()
        };
        let err = Fast2SmsSender::new(&config).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }
}
