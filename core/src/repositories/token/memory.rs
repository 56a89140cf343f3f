//! In-process refresh-token store

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::token::RefreshTokenRecord;
use crate::errors::DomainError;

use super::r#trait::RefreshTokenRepository;

/// Refresh-token store backed by a map behind an async lock
///
/// Every operation takes the lock once, so the conditional revoke is atomic
/// within a process. Clones share the same storage.
#[derive(Clone, Default)]
pub struct InMemoryRefreshTokenRepository {
    records: Arc<RwLock<HashMap<Uuid, RefreshTokenRecord>>>,
}

impl InMemoryRefreshTokenRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records, live or not
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl RefreshTokenRepository for InMemoryRefreshTokenRepository {
    async fn save(&self, record: &RefreshTokenRecord) -> Result<(), DomainError> {
        let mut records = self.records.write().await;

        let collides = records
            .values()
            .any(|r| r.id() != record.id() && r.hashed_token() == record.hashed_token());
        if collides {
            return Err(DomainError::Validation {
                message: "Refresh token hash already exists".to_string(),
            });
        }

        records.insert(record.id(), record.clone());
        Ok(())
    }

    async fn find_valid_by_hash(
        &self,
        hashed_token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<RefreshTokenRecord>, DomainError> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .find(|r| {
                r.hashed_token() == hashed_token && r.valid_until() > now && !r.is_revoked()
            })
            .cloned())
    }

    async fn find_by_hash(&self, hashed_token: &str) -> Result<Option<RefreshTokenRecord>, DomainError> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .find(|r| r.hashed_token() == hashed_token)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<RefreshTokenRecord>, DomainError> {
        Ok(self.records.read().await.get(&id).cloned())
    }

    async fn delete(&self, record: &RefreshTokenRecord) -> Result<(), DomainError> {
        self.records.write().await.remove(&record.id());
        Ok(())
    }

    async fn revoke_by_hash(
        &self,
        hashed_token: &str,
        revoked_at: DateTime<Utc>,
    ) -> Result<usize, DomainError> {
        let mut records = self.records.write().await;
        let mut revoked = 0;
        for record in records
            .values_mut()
            .filter(|r| r.hashed_token() == hashed_token && !r.is_revoked())
        {
            record.mark_revoked(revoked_at);
            revoked += 1;
        }
        Ok(revoked)
    }

    async fn compare_and_revoke(&self, record: &RefreshTokenRecord) -> Result<bool, DomainError> {
        let revoked_at = match record.revoked_at() {
            Some(at) => at,
            None => {
                return Err(DomainError::Internal {
                    message: "compare_and_revoke called with an unrevoked record".to_string(),
                })
            }
        };

        let mut records = self.records.write().await;
        match records.get_mut(&record.id()) {
            Some(stored) if !stored.is_revoked() => {
                stored.mark_revoked(revoked_at);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete_dead_before(&self, cutoff: DateTime<Utc>) -> Result<usize, DomainError> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|_, r| {
            let expired = r.valid_until() < cutoff;
            let revoked = r.revoked_at().map_or(false, |at| at < cutoff);
            !(expired || revoked)
        });
        Ok(before - records.len())
    }
}
