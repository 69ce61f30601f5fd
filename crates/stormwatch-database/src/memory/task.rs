use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;

use stormwatch_core::result::AppResult;
use stormwatch_core::types::TaskId;
use stormwatch_entity::task::{CreateTask, Task};

use crate::store::TaskStore;

#[derive(Debug, Clone, Default)]
pub struct MemoryTaskStore {
    tasks: Arc<DashMap<TaskId, Task>>,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn create(&self, input: CreateTask) -> AppResult<Task> {
        let task = input.into_task(Utc::now());
        self.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn find_by_id(&self, id: TaskId) -> AppResult<Option<Task>> {
        Ok(self.tasks.get(&id).map(|t| t.value().clone()))
    }

    async fn list_for_user(&self, email: &str) -> AppResult<Vec<Task>> {
        let mut tasks: Vec<Task> = self
            .tasks
            .iter()
            .filter(|entry| entry.user_email == email)
            .map(|entry| entry.value().clone())
            .collect();
        tasks.sort_by_key(|t| (t.created_at, t.id.0));
        Ok(tasks)
    }

    async fn delete(&self, id: TaskId) -> AppResult<bool> {
        Ok(self.tasks.remove(&id).is_some())
    }
}
