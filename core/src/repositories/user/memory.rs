//! In-process user directory

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::user::User;
use crate::errors::DomainError;

use super::r#trait::UserRepository;

/// User directory keyed by lower-cased email
#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<String, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a user
    pub async fn insert(&self, user: User) {
        self.users.write().await.insert(user.email.to_lowercase(), user);
    }

    /// Remove a user by email, returning it if present
    pub async fn remove(&self, email: &str) -> Option<User> {
        self.users.write().await.remove(&email.to_lowercase())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        Ok(self.users.read().await.get(&email.to_lowercase()).cloned())
    }
}
