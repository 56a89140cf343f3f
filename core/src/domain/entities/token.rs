//! Token entities: access-token claims, issued token pairs and persisted refresh-token records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::TokenError;

/// Token type reported with every pair
pub const TOKEN_TYPE_BEARER: &str = "Bearer";

/// Maximum stored length of a client IP (IPv6 text form)
pub const MAX_IP_LENGTH: usize = 45;

/// Maximum stored length of a user-agent string
pub const MAX_USER_AGENT_LENGTH: usize = 255;

/// Caller-supplied claims identifying the authenticated user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectClaims {
    /// Subject (user ID)
    pub sub: String,

    /// User email
    pub email: String,

    /// Role identifiers at issuance time, in order
    pub roles: Vec<String>,
}

/// Claims structure for the access-token payload
///
/// Field order matches the serialized payload: registered claims first,
/// then the subject claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Issuer
    pub iss: String,

    /// Audience
    pub aud: String,

    /// Issued at timestamp
    pub iat: i64,

    /// Not before timestamp
    pub nbf: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// JWT ID (unique identifier for the token)
    pub jti: String,

    #[serde(flatten)]
    pub subject: SubjectClaims,
}

impl Claims {
    /// Creates claims for an access token valid from `issued_at` until `expires_at`
    pub fn new(
        issuer: impl Into<String>,
        audience: impl Into<String>,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
        jti: impl Into<String>,
        subject: SubjectClaims,
    ) -> Self {
        Self {
            iss: issuer.into(),
            aud: audience.into(),
            iat: issued_at.timestamp(),
            nbf: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            jti: jti.into(),
            subject,
        }
    }

    /// Checks if the claims are expired at `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }

    /// Checks whether the subject holds `role`
    pub fn has_role(&self, role: &str) -> bool {
        self.subject.roles.iter().any(|r| r == role)
    }
}

/// Result of one issuance: a signed access token plus a cleartext refresh secret
///
/// The refresh secret is the only copy in cleartext; the store keeps its hash.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenPair {
    access_token: String,
    refresh_token: String,
    issued_at: DateTime<Utc>,
    access_token_expires_at: DateTime<Utc>,
    refresh_token_expires_at: DateTime<Utc>,
    token_type: String,
    scopes: Vec<String>,
}

impl std::fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenPair")
            .field("issued_at", &self.issued_at)
            .field("access_token_expires_at", &self.access_token_expires_at)
            .field("refresh_token_expires_at", &self.refresh_token_expires_at)
            .field("token_type", &self.token_type)
            .field("scopes", &self.scopes)
            .finish_non_exhaustive()
    }
}

impl TokenPair {
    /// Creates a token pair
    ///
    /// # Arguments
    ///
    /// * `access_token` - The signed access token
    /// * `refresh_token` - The cleartext refresh secret
    /// * `issued_at` - Issuance instant
    /// * `access_token_expires_at` - Must be strictly after `issued_at`
    /// * `refresh_token_expires_at` - Must be strictly after `issued_at`
    /// * `scopes` - Role identifiers granted by this pair
    ///
    /// # Returns
    ///
    /// * `Ok(TokenPair)` - The validated pair
    /// * `Err(TokenError::InvalidTokenPair)` - An expiry is not after `issued_at`
    pub fn new(
        access_token: String,
        refresh_token: String,
        issued_at: DateTime<Utc>,
        access_token_expires_at: DateTime<Utc>,
        refresh_token_expires_at: DateTime<Utc>,
        scopes: Vec<String>,
    ) -> Result<Self, TokenError> {
        if issued_at >= access_token_expires_at {
            return Err(TokenError::InvalidTokenPair {
                message: "access token expiration must be after issued at".to_string(),
            });
        }
        if issued_at >= refresh_token_expires_at {
            return Err(TokenError::InvalidTokenPair {
                message: "refresh token expiration must be after issued at".to_string(),
            });
        }

        Ok(Self {
            access_token,
            refresh_token,
            issued_at,
            access_token_expires_at,
            refresh_token_expires_at,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            scopes,
        })
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn refresh_token(&self) -> &str {
        &self.refresh_token
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    pub fn access_token_expires_at(&self) -> DateTime<Utc> {
        self.access_token_expires_at
    }

    pub fn refresh_token_expires_at(&self) -> DateTime<Utc> {
        self.refresh_token_expires_at
    }

    pub fn token_type(&self) -> &str {
        &self.token_type
    }

    pub fn scopes(&self) -> &[String] {
        &self.scopes
    }

    /// Seconds between issuance and access-token expiry
    pub fn expires_in(&self) -> i64 {
        self.access_token_expires_at.timestamp() - self.issued_at.timestamp()
    }

    /// Seconds between issuance and refresh-token expiry
    pub fn refresh_expires_in(&self) -> i64 {
        self.refresh_token_expires_at.timestamp() - self.issued_at.timestamp()
    }

    /// Returns a copy carrying a different refresh secret and expiry
    pub fn with_rotated_refresh_token(
        &self,
        refresh_token: String,
        refresh_token_expires_at: DateTime<Utc>,
    ) -> Result<Self, TokenError> {
        Self::new(
            self.access_token.clone(),
            refresh_token,
            self.issued_at,
            self.access_token_expires_at,
            refresh_token_expires_at,
            self.scopes.clone(),
        )
    }
}

/// Lifecycle state of a refresh-token record at a given instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshTokenState {
    Live,
    Revoked,
    Expired,
}

/// Storage row for a refresh-token record, as read back from persistence
#[derive(Debug, Clone)]
pub struct RefreshTokenRow {
    pub id: Uuid,
    pub subject_identifier: String,
    pub hashed_token: String,
    pub valid_until: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub created_by_ip: Option<String>,
    pub user_agent: Option<String>,
    pub revoked_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Persisted refresh-token record
///
/// Holds only the hash of the refresh secret. Once revoked, only `rotate`
/// brings a record back; the token manager never calls it on a revoked record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshTokenRecord {
    id: Uuid,
    subject_identifier: String,
    hashed_token: String,
    valid_until: DateTime<Utc>,
    created_at: DateTime<Utc>,
    created_by_ip: Option<String>,
    user_agent: Option<String>,
    revoked_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl RefreshTokenRecord {
    /// Creates a new live record
    ///
    /// # Arguments
    ///
    /// * `subject_identifier` - Identity the token authenticates (the user's email)
    /// * `hashed_token` - Hash of the refresh secret
    /// * `valid_until` - Absolute expiry
    /// * `created_at` - Issuance instant
    pub fn new(
        subject_identifier: impl Into<String>,
        hashed_token: impl Into<String>,
        valid_until: DateTime<Utc>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            subject_identifier: subject_identifier.into(),
            hashed_token: hashed_token.into(),
            valid_until,
            created_at,
            created_by_ip: None,
            user_agent: None,
            revoked_at: None,
            updated_at: None,
        }
    }

    /// Attaches request metadata, truncated to the storage limits
    pub fn with_request_metadata(
        mut self,
        ip_address: Option<&str>,
        user_agent: Option<&str>,
    ) -> Self {
        self.created_by_ip = ip_address.map(|ip| truncate(ip, MAX_IP_LENGTH));
        self.user_agent = user_agent.map(|ua| truncate(ua, MAX_USER_AGENT_LENGTH));
        self
    }

    /// Rebuilds a record from a storage row
    pub fn reconstitute(row: RefreshTokenRow) -> Self {
        Self {
            id: row.id,
            subject_identifier: row.subject_identifier,
            hashed_token: row.hashed_token,
            valid_until: row.valid_until,
            created_at: row.created_at,
            created_by_ip: row.created_by_ip,
            user_agent: row.user_agent,
            revoked_at: row.revoked_at,
            updated_at: row.updated_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn subject_identifier(&self) -> &str {
        &self.subject_identifier
    }

    pub fn hashed_token(&self) -> &str {
        &self.hashed_token
    }

    pub fn valid_until(&self) -> DateTime<Utc> {
        self.valid_until
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn created_by_ip(&self) -> Option<&str> {
        self.created_by_ip.as_deref()
    }

    pub fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }

    pub fn revoked_at(&self) -> Option<DateTime<Utc>> {
        self.revoked_at
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    /// Marks the record revoked. The first revocation instant is kept.
    pub fn mark_revoked(&mut self, at: DateTime<Utc>) {
        if self.revoked_at.is_none() {
            self.revoked_at = Some(at);
        }
        self.updated_at = Some(at);
    }

    /// Re-arms the record with a new secret hash and expiry
    pub fn rotate(
        &mut self,
        hashed_token: impl Into<String>,
        valid_until: DateTime<Utc>,
        ip_address: Option<&str>,
        user_agent: Option<&str>,
        at: DateTime<Utc>,
    ) {
        self.hashed_token = hashed_token.into();
        self.valid_until = valid_until;
        self.created_by_ip = ip_address.map(|ip| truncate(ip, MAX_IP_LENGTH));
        self.user_agent = user_agent.map(|ua| truncate(ua, MAX_USER_AGENT_LENGTH));
        self.revoked_at = None;
        self.updated_at = Some(at);
    }

    /// Expired strictly after `valid_until`
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.valid_until
    }

    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }

    /// Neither revoked nor expired at `now`
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        !self.is_revoked() && !self.is_expired(now)
    }

    /// Lifecycle state at `now`; revocation wins over expiry
    pub fn state(&self, now: DateTime<Utc>) -> RefreshTokenState {
        if self.is_revoked() {
            RefreshTokenState::Revoked
        } else if self.is_expired(now) {
            RefreshTokenState::Expired
        } else {
            RefreshTokenState::Live
        }
    }
}

fn truncate(value: &str, max_chars: usize) -> String {
    value.chars().take(max_chars).collect()
}
