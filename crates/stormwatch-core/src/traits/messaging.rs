//! Outbound messaging channels.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::result::AppResult;

/// A single outbound email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    /// Plain-text body, always present.
    pub text: String,
    /// Optional HTML alternative.
    pub html: Option<String>,
}

impl EmailMessage {
    pub fn plain(to: impl Into<String>, subject: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            text: text.into(),
            html: None,
        }
    }

    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.html = Some(html.into());
        self
    }
}

/// A single outbound SMS.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmsMessage {
    /// Recipient phone number as stored on the user.
    pub to: String,
    pub body: String,
}

impl SmsMessage {
    pub fn new(to: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            body: body.into(),
        }
    }
}

/// Transactional email channel.
#[async_trait]
pub trait EmailSender: Send + Sync + std::fmt::Debug + 'static {
    async fn send(&self, message: &EmailMessage) -> AppResult<()>;
}

/// SMS gateway channel.
#[async_trait]
pub trait SmsSender: Send + Sync + std::fmt::Debug + 'static {
    async fn send(&self, message: &SmsMessage) -> AppResult<()>;
}
