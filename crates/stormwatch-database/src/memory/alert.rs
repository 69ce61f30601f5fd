use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

use stormwatch_core::result::AppResult;
use stormwatch_core::types::AlertId;
use stormwatch_entity::alert::{Alert, CreateAlert};

use crate::store::AlertStore;

#[derive(Debug, Clone, Default)]
pub struct MemoryAlertStore {
    alerts: Arc<DashMap<AlertId, Alert>>,
}

impl MemoryAlertStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every stored alert, in creation order.
    pub fn all(&self) -> Vec<Alert> {
        let mut alerts: Vec<Alert> = self.alerts.iter().map(|e| e.value().clone()).collect();
        alerts.sort_by_key(|a| (a.created_at, a.id.0));
        alerts
    }

    pub fn get(&self, id: AlertId) -> Option<Alert> {
        self.alerts.get(&id).map(|a| a.value().clone())
    }
}

#[async_trait]
impl AlertStore for MemoryAlertStore {
    async fn create(&self, input: CreateAlert) -> AppResult<Alert> {
        let alert = input.into_alert(Utc::now());
        self.alerts.insert(alert.id, alert.clone());
        Ok(alert)
    }

    async fn find_due(&self, now: DateTime<Utc>) -> AppResult<Vec<Alert>> {
        let mut due: Vec<Alert> = self
            .alerts
            .iter()
            .filter(|entry| entry.is_due(now))
            .map(|entry| entry.value().clone())
            .collect();
        due.sort_by_key(|a| (a.trigger_time, a.id.0));
        Ok(due)
    }

    async fn mark_delivered(&self, id: AlertId) -> AppResult<bool> {
        match self.alerts.get_mut(&id) {
            Some(mut alert) if !alert.delivered => {
                alert.delivered = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn list_for_user(&self, email: &str) -> AppResult<Vec<Alert>> {
        let mut alerts: Vec<Alert> = self
            .alerts
            .iter()
            .filter(|entry| entry.user_email == email)
            .map(|entry| entry.value().clone())
            .collect();
        alerts.sort_by(|a, b| (b.created_at, b.id.0).cmp(&(a.created_at, a.id.0)));
        Ok(alerts)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use stormwatch_entity::alert::{AlertCategory, Severity};

    use super::*;

    fn create_at(trigger: DateTime<Utc>) -> CreateAlert {
        CreateAlert {
            user_email: "a@example.com".into(),
            category: AlertCategory::Weather,
            title: "Weather Alert for: Run".into(),
            severity: Severity::Medium,
            location: "Your Location".into(),
            description: "desc".into(),
            source: "OpenWeatherMap".into(),
            trigger_time: Some(trigger),
        }
    }

    #[tokio::test]
    async fn test_delivered_alert_is_never_reselected() {
        let store = MemoryAlertStore::new();
        let now = Utc::now();
        let alert = store.create(create_at(now - Duration::minutes(5))).await.unwrap();

        let due = store.find_due(now).await.unwrap();
        assert_eq!(due.len(), 1);

        assert!(store.mark_delivered(alert.id).await.unwrap());
        assert!(store.find_due(now).await.unwrap().is_empty());
        assert!(store.find_due(now + Duration::days(1)).await.unwrap().is_empty());
        assert!(!store.mark_delivered(alert.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_find_due_orders_by_trigger_and_excludes_future() {
        let store = MemoryAlertStore::new();
        let now = Utc::now();
        let later = store.create(create_at(now - Duration::minutes(1))).await.unwrap();
        let earlier = store.create(create_at(now - Duration::hours(1))).await.unwrap();
        store.create(create_at(now + Duration::minutes(1))).await.unwrap();

        let due: Vec<AlertId> = store.find_due(now).await.unwrap().into_iter().map(|a| a.id).collect();
        assert_eq!(due, vec![earlier.id, later.id]);
    }
}
