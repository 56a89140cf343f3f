//! MySQL implementation of the UserRepository trait.

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use edu_core::domain::entities::user::User;
use edu_core::errors::DomainError;
use edu_core::repositories::UserRepository;

use super::db_error;

/// MySQL implementation of UserRepository
///
/// Roles are stored as a JSON array in the `roles` column.
pub struct MySqlUserRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlUserRepository {
    /// Create a new MySQL user repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_user(row: &sqlx::mysql::MySqlRow) -> Result<User, DomainError> {
        let id: String = row.try_get("id").map_err(db_error("Failed to get id"))?;
        let email: String = row.try_get("email").map_err(db_error("Failed to get email"))?;
        let roles: Json<Vec<String>> = row.try_get("roles").map_err(db_error("Failed to get roles"))?;

        Ok(User::new(
            Uuid::parse_str(&id).map_err(|e| DomainError::Internal {
                message: format!("Invalid user UUID: {}", e),
            })?,
            email,
            roles.0,
        ))
    }
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let row = sqlx::query("SELECT id, email, roles FROM users WHERE email = ? LIMIT 1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find user by email"))?;

        row.as_ref().map(Self::row_to_user).transpose()
    }
}
