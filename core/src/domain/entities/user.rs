//! User identity as seen by the token lifecycle.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::token::SubjectClaims;

/// Role granted to every authenticated user
pub const ROLE_USER: &str = "ROLE_USER";

/// A verified user, as resolved by the user-lookup collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for the user, used as the `sub` claim
    pub id: Uuid,

    /// Email address, used as the refresh-token subject identifier
    pub email: String,

    /// Role identifiers, in the order they were assigned
    pub roles: Vec<String>,
}

impl User {
    /// Creates a user, always including `ROLE_USER`
    pub fn new(id: Uuid, email: impl Into<String>, roles: Vec<String>) -> Self {
        let mut roles = roles;
        if !roles.iter().any(|r| r == ROLE_USER) {
            roles.push(ROLE_USER.to_string());
        }
        Self {
            id,
            email: email.into(),
            roles,
        }
    }

    /// Identity string stored on refresh-token records
    pub fn subject_identifier(&self) -> &str {
        &self.email
    }

    /// Claims embedded in access tokens issued for this user
    pub fn subject_claims(&self) -> SubjectClaims {
        SubjectClaims {
            sub: self.id.to_string(),
            email: self.email.clone(),
            roles: self.roles.clone(),
        }
    }
}
