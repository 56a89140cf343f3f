//! User lookup contract consumed by the token manager.

use async_trait::async_trait;

use crate::domain::entities::user::User;
use crate::errors::DomainError;

/// Resolves the owner of a refresh token
///
/// The token lifecycle does not own users; it only needs to know whether the
/// subject of a refresh token still exists and which roles it currently holds.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by email
    ///
    /// # Returns
    /// * `Ok(Some(User))` - User exists
    /// * `Ok(None)` - No user with that email
    /// * `Err(DomainError)` - Lookup failed
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;
}
