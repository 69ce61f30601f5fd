use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;

use stormwatch_core::error::AppError;
use stormwatch_core::result::AppResult;
use stormwatch_core::types::UserId;
use stormwatch_entity::user::{CreateUser, User, UserLocation};

use crate::store::UserStore;

#[derive(Debug, Clone, Default)]
pub struct MemoryUserStore {
    users: Arc<DashMap<UserId, User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    fn find(&self, predicate: impl Fn(&User) -> bool) -> Option<User> {
        let mut matches: Vec<User> = self
            .users
            .iter()
            .filter(|entry| predicate(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        matches.sort_by_key(|u| u.created_at);
        matches.into_iter().next()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self.find(|u| u.email.eq_ignore_ascii_case(email)))
    }

    async fn find_by_identifier(&self, identifier: &str) -> AppResult<Option<User>> {
        Ok(self.find(|u| u.email.eq_ignore_ascii_case(identifier) || u.phone == identifier))
    }

    async fn exists_by_email_or_phone(&self, email: &str, phone: &str) -> AppResult<bool> {
        Ok(self
            .find(|u| u.email.eq_ignore_ascii_case(email) || u.phone == phone)
            .is_some())
    }

    async fn create(&self, input: CreateUser) -> AppResult<User> {
        if self.find_by_email(&input.email).await?.is_some() {
            return Err(AppError::conflict("User already exists"));
        }
        let user = input.into_user(Utc::now());
        self.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update_location(&self, id: UserId, location: &UserLocation) -> AppResult<()> {
        if let Some(mut user) = self.users.get_mut(&id) {
            user.set_location(location);
        }
        Ok(())
    }

    async fn list_verified(&self) -> AppResult<Vec<User>> {
        let mut users: Vec<User> = self
            .users
            .iter()
            .filter(|entry| entry.is_verified)
            .map(|entry| entry.value().clone())
            .collect();
        users.sort_by_key(|u| u.created_at);
        Ok(users)
    }
}
