use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use dashmap::DashMap;

use stormwatch_core::result::AppResult;
use stormwatch_entity::job::JobRunMarker;

use crate::store::JobMarkerStore;

#[derive(Debug, Clone, Default)]
pub struct MemoryJobMarkerStore {
    markers: Arc<DashMap<String, JobRunMarker>>,
}

impl MemoryJobMarkerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JobMarkerStore for MemoryJobMarkerStore {
    async fn last_run(&self, job_name: &str) -> AppResult<Option<NaiveDate>> {
        Ok(self.markers.get(job_name).map(|m| m.last_run_date))
    }

    async fn record_run(&self, job_name: &str, date: NaiveDate) -> AppResult<()> {
        self.markers.insert(
            job_name.to_string(),
            JobRunMarker {
                job_name: job_name.to_string(),
                last_run_date: date,
                updated_at: Utc::now(),
            },
        );
        Ok(())
    }
}
