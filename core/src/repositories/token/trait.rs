//! Refresh-token store contract.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::token::RefreshTokenRecord;
use crate::errors::DomainError;

/// Persistence for refresh-token records, keyed by hashed token value
///
/// Implementations never see cleartext refresh secrets. Absence is reported as
/// `Ok(None)`; `Err` is reserved for infrastructure faults.
///
/// # Concurrency
/// `compare_and_revoke` must be atomic with respect to other writers of the
/// same record, including writers in other processes. The token manager relies
/// on it so that a refresh token can be rotated at most once.
#[async_trait]
pub trait RefreshTokenRepository: Send + Sync {
    /// Insert or update a record by id
    ///
    /// # Returns
    /// * `Ok(())` - Record persisted
    /// * `Err(DomainError)` - Write failed, including a hash collision with another record
    async fn save(&self, record: &RefreshTokenRecord) -> Result<(), DomainError>;

    /// Find a live record by hash
    ///
    /// Returns a record only if the hash matches, `valid_until > now` and the
    /// record has not been revoked.
    async fn find_valid_by_hash(
        &self,
        hashed_token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<RefreshTokenRecord>, DomainError>;

    /// Find a record by hash regardless of its state
    ///
    /// Used only to classify and clean up a refused token, never to issue.
    async fn find_by_hash(&self, hashed_token: &str) -> Result<Option<RefreshTokenRecord>, DomainError>;

    /// Find a record by id regardless of its state
    async fn find_by_id(&self, id: Uuid) -> Result<Option<RefreshTokenRecord>, DomainError>;

    /// Remove a record. Removing a missing record is not an error.
    async fn delete(&self, record: &RefreshTokenRecord) -> Result<(), DomainError>;

    /// Revoke every unrevoked record with this hash
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of records revoked, zero when none matched
    async fn revoke_by_hash(
        &self,
        hashed_token: &str,
        revoked_at: DateTime<Utc>,
    ) -> Result<usize, DomainError>;

    /// Persist the revocation carried by `record`, but only if the stored copy is still unrevoked
    ///
    /// # Arguments
    /// * `record` - A record on which `mark_revoked` has been called
    ///
    /// # Returns
    /// * `Ok(true)` - This call performed the revocation
    /// * `Ok(false)` - The stored record was already revoked or is gone
    async fn compare_and_revoke(&self, record: &RefreshTokenRecord) -> Result<bool, DomainError>;

    /// Delete records that expired or were revoked before `cutoff`
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of records deleted
    async fn delete_dead_before(&self, cutoff: DateTime<Utc>) -> Result<usize, DomainError>;
}
