//! Background worker configuration.

use serde::{Deserialize, Serialize};

/// Periodic job configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Whether the job runner is started with the server.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Six-field cron expression for the tick (seconds first).
    #[serde(default = "default_tick_cron")]
    pub tick_cron: String,
    /// How long before a task its weather alert becomes due.
    #[serde(default = "default_alert_lead")]
    pub alert_lead_minutes: i64,
    /// Local time of day (`HH:MM`) after which the daily digest goes out.
    #[serde(default = "default_digest_time")]
    pub digest_time: String,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            tick_cron: default_tick_cron(),
            alert_lead_minutes: default_alert_lead(),
            digest_time: default_digest_time(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_tick_cron() -> String {
    "0 * * * * *".to_string()
}

fn default_alert_lead() -> i64 {
    120
}

fn default_digest_time() -> String {
    "07:34".to_string()
}
