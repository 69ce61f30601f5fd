use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;

use stormwatch_core::result::AppResult;
use stormwatch_entity::mail::{CreateMailLogEntry, MailLogEntry};

use crate::store::MailLogStore;

/// Entries keyed by recipient email, each list in append order.
#[derive(Debug, Clone, Default)]
pub struct MemoryMailLogStore {
    entries: Arc<DashMap<String, Vec<MailLogEntry>>>,
}

impl MemoryMailLogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every entry across recipients, oldest first.
    pub fn all(&self) -> Vec<MailLogEntry> {
        let mut all: Vec<MailLogEntry> = self
            .entries
            .iter()
            .flat_map(|entry| entry.value().clone())
            .collect();
        all.sort_by_key(|e| e.sent_at);
        all
    }
}

#[async_trait]
impl MailLogStore for MemoryMailLogStore {
    async fn append(&self, entry: CreateMailLogEntry) -> AppResult<MailLogEntry> {
        let entry = entry.into_entry(Utc::now());
        self.entries
            .entry(entry.user_email.clone())
            .or_default()
            .push(entry.clone());
        Ok(entry)
    }

    async fn list_for_user(&self, email: &str) -> AppResult<Vec<MailLogEntry>> {
        Ok(self
            .entries
            .get(email)
            .map(|list| list.iter().rev().cloned().collect())
            .unwrap_or_default())
    }
}
