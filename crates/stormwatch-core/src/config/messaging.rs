//! Email and SMS gateway configuration.

use serde::{Deserialize, Serialize};

/// Outbound messaging configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessagingConfig {
    /// SMTP email settings.
    #[serde(default)]
    pub smtp: SmtpConfig,
    /// Fast2SMS settings.
    #[serde(default)]
    pub sms: SmsConfig,
}

/// SMTP relay settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    /// When false, emails are logged instead of sent.
    #[serde(default)]
    pub enabled: bool,
    /// Relay host (STARTTLS).
    #[serde(default = "default_smtp_host")]
    pub host: String,
    /// Relay port.
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    /// SMTP username.
    #[serde(default)]
    pub username: String,
    /// SMTP password or app password.
    #[serde(default)]
    pub password: String,
    /// `From` address; falls back to `username` when empty.
    #[serde(default)]
    pub from_address: String,
    /// Transport timeout in seconds.
    #[serde(default = "default_smtp_timeout")]
    pub timeout_seconds: u64,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            host: default_smtp_host(),
            port: default_smtp_port(),
            username: String::new(),
            password: String::new(),
            from_address: String::new(),
            timeout_seconds: default_smtp_timeout(),
        }
    }
}

/// Fast2SMS gateway settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmsConfig {
    /// When false, SMS messages are logged instead of sent.
    #[serde(default)]
    pub enabled: bool,
    /// Bulk send endpoint.
    #[serde(default = "default_sms_url")]
    pub api_url: String,
    /// API key sent in the `Authorization` header.
    #[serde(default)]
    pub api_key: String,
    /// Approved sender id.
    #[serde(default = "default_sender_id")]
    pub sender_id: String,
    /// Outbound HTTP timeout in seconds.
    #[serde(default = "default_sms_timeout")]
    pub timeout_seconds: u64,
}

impl Default for SmsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_url: default_sms_url(),
            api_key: String::new(),
            sender_id: default_sender_id(),
            timeout_seconds: default_sms_timeout(),
        }
    }
}

fn default_smtp_host() -> String {
    "smtp.gmail.com".to_string()
}

fn default_smtp_port() -> u16 {
    587
}

fn default_smtp_timeout() -> u64 {
    30
}

fn default_sms_url() -> String {
    "https://www.fast2sms.com/dev/bulkV2".to_string()
}

fn default_sender_id() -> String {
    "WTHAPP".to_string()
}

fn default_sms_timeout() -> u64 {
    30
}
