//! Last-run marker for once-per-day jobs.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Records the local date a named job last ran.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct JobRunMarker {
    pub job_name: String,
    pub last_run_date: NaiveDate,
    pub updated_at: DateTime<Utc>,
}
