//! MySQL implementation of the RefreshTokenRepository trait.
//!
//! Records live in the `refresh_tokens` table; the `refresh_token` column holds
//! the peppered hash, never the secret itself. The conditional revoke relies on
//! a single `UPDATE ... WHERE revoked_at IS NULL`, which InnoDB applies
//! atomically per row.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use edu_core::domain::entities::token::{RefreshTokenRecord, RefreshTokenRow};
use edu_core::errors::DomainError;
use edu_core::repositories::RefreshTokenRepository;

use super::db_error;

const SELECT_COLUMNS: &str = r#"
    SELECT id, username, refresh_token, valid_until, created_at,
           created_by_ip, user_agent, revoked_at, updated_at
    FROM refresh_tokens
"#;

/// MySQL implementation of RefreshTokenRepository
pub struct MySqlRefreshTokenRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlRefreshTokenRepository {
    /// Create a new MySQL refresh-token repository
    ///
    /// # Arguments
    /// * `pool` - MySQL connection pool from SQLx
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert a database row to a RefreshTokenRecord
    fn row_to_record(row: &sqlx::mysql::MySqlRow) -> Result<RefreshTokenRecord, DomainError> {
        let id: String = row.try_get("id").map_err(db_error("Failed to get id"))?;

        Ok(RefreshTokenRecord::reconstitute(RefreshTokenRow {
            id: Uuid::parse_str(&id).map_err(|e| DomainError::Internal {
                message: format!("Invalid refresh token UUID: {}", e),
            })?,
            subject_identifier: row
                .try_get("username")
                .map_err(db_error("Failed to get username"))?,
            hashed_token: row
                .try_get("refresh_token")
                .map_err(db_error("Failed to get refresh_token"))?,
            valid_until: row
                .try_get::<DateTime<Utc>, _>("valid_until")
                .map_err(db_error("Failed to get valid_until"))?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(db_error("Failed to get created_at"))?,
            created_by_ip: row
                .try_get("created_by_ip")
                .map_err(db_error("Failed to get created_by_ip"))?,
            user_agent: row
                .try_get("user_agent")
                .map_err(db_error("Failed to get user_agent"))?,
            revoked_at: row
                .try_get::<Option<DateTime<Utc>>, _>("revoked_at")
                .map_err(db_error("Failed to get revoked_at"))?,
            updated_at: row
                .try_get::<Option<DateTime<Utc>>, _>("updated_at")
                .map_err(db_error("Failed to get updated_at"))?,
        }))
    }

    async fn fetch_one_where(
        &self,
        clause: &str,
        binds: &[String],
    ) -> Result<Option<RefreshTokenRecord>, DomainError> {
        let sql = format!("{} WHERE {} LIMIT 1", SELECT_COLUMNS, clause);
        let mut query = sqlx::query(&sql);
        for value in binds {
            query = query.bind(value);
        }

        let row = query
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find refresh token"))?;

        row.as_ref().map(Self::row_to_record).transpose()
    }
}

fn unique_violation_to_validation(e: sqlx::Error) -> DomainError {
    let duplicate = e
        .as_database_error()
        .map(|db| db.is_unique_violation())
        .unwrap_or(false);

    if duplicate {
        DomainError::Validation {
            message: "Refresh token hash already exists".to_string(),
        }
    } else {
        DomainError::Internal {
            message: format!("Failed to save refresh token: {}", e),
        }
    }
}

#[async_trait]
impl RefreshTokenRepository for MySqlRefreshTokenRepository {
    async fn save(&self, record: &RefreshTokenRecord) -> Result<(), DomainError> {
        let id = record.id().to_string();

        // One statement; a hash owned by another row is left untouched here and
        // reported below.
        sqlx::query(
            r#"
                INSERT INTO refresh_tokens (
                    id, username, refresh_token, valid_until, created_at,
                    created_by_ip, user_agent, revoked_at, updated_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
                ON DUPLICATE KEY UPDATE
                    username = IF(id = VALUES(id), VALUES(username), username),
                    refresh_token = IF(id = VALUES(id), VALUES(refresh_token), refresh_token),
                    valid_until = IF(id = VALUES(id), VALUES(valid_until), valid_until),
                    created_at = IF(id = VALUES(id), VALUES(created_at), created_at),
                    created_by_ip = IF(id = VALUES(id), VALUES(created_by_ip), created_by_ip),
                    user_agent = IF(id = VALUES(id), VALUES(user_agent), user_agent),
                    revoked_at = IF(id = VALUES(id), VALUES(revoked_at), revoked_at),
                    updated_at = IF(id = VALUES(id), VALUES(updated_at), updated_at)
            "#,
        )
        .bind(&id)
        .bind(record.subject_identifier())
        .bind(record.hashed_token())
        .bind(record.valid_until())
        .bind(record.created_at())
        .bind(record.created_by_ip())
        .bind(record.user_agent())
        .bind(record.revoked_at())
        .bind(record.updated_at())
        .execute(&self.pool)
        .await
        .map_err(unique_violation_to_validation)?;

        let owner: Option<String> =
            sqlx::query_scalar("SELECT id FROM refresh_tokens WHERE refresh_token = ?")
                .bind(record.hashed_token())
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error("Failed to verify saved refresh token"))?;

        match owner {
            Some(owner) if owner == id => Ok(()),
            _ => Err(DomainError::Validation {
                message: "Refresh token hash already exists".to_string(),
            }),
        }
    }

    async fn find_valid_by_hash(
        &self,
        hashed_token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<RefreshTokenRecord>, DomainError> {
        let sql = format!(
            "{} WHERE refresh_token = ? AND valid_until > ? AND revoked_at IS NULL LIMIT 1",
            SELECT_COLUMNS
        );

        let row = sqlx::query(&sql)
            .bind(hashed_token)
            .bind(now)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find valid refresh token"))?;

        row.as_ref().map(Self::row_to_record).transpose()
    }

    async fn find_by_hash(
        &self,
        hashed_token: &str,
    ) -> Result<Option<RefreshTokenRecord>, DomainError> {
        self.fetch_one_where("refresh_token = ?", &[hashed_token.to_string()])
            .await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<RefreshTokenRecord>, DomainError> {
        self.fetch_one_where("id = ?", &[id.to_string()]).await
    }

    async fn delete(&self, record: &RefreshTokenRecord) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM refresh_tokens WHERE id = ?")
            .bind(record.id().to_string())
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to delete refresh token"))?;

        Ok(())
    }

    async fn revoke_by_hash(
        &self,
        hashed_token: &str,
        revoked_at: DateTime<Utc>,
    ) -> Result<usize, DomainError> {
        let result = sqlx::query(
            r#"
                UPDATE refresh_tokens
                SET revoked_at = ?, updated_at = ?
                WHERE refresh_token = ? AND revoked_at IS NULL
            "#,
        )
        .bind(revoked_at)
        .bind(revoked_at)
        .bind(hashed_token)
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to revoke refresh token"))?;

        Ok(result.rows_affected() as usize)
    }

    async fn compare_and_revoke(&self, record: &RefreshTokenRecord) -> Result<bool, DomainError> {
        let revoked_at = record.revoked_at().ok_or_else(|| DomainError::Internal {
            message: "compare_and_revoke called with an unrevoked record".to_string(),
        })?;

        let result = sqlx::query(
            r#"
                UPDATE refresh_tokens
                SET revoked_at = ?, updated_at = ?
                WHERE id = ? AND revoked_at IS NULL
            "#,
        )
        .bind(revoked_at)
        .bind(record.updated_at().unwrap_or(revoked_at))
        .bind(record.id().to_string())
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to revoke refresh token"))?;

        Ok(result.rows_affected() == 1)
    }

    async fn delete_dead_before(&self, cutoff: DateTime<Utc>) -> Result<usize, DomainError> {
        let result = sqlx::query(
            r#"
                DELETE FROM refresh_tokens
                WHERE valid_until < ? OR (revoked_at IS NOT NULL AND revoked_at < ?)
            "#,
        )
        .bind(cutoff)
        .bind(cutoff)
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to delete dead refresh tokens"))?;

        Ok(result.rows_affected() as usize)
    }
}
