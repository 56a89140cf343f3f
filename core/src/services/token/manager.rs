//! Token manager: issuance, rotation and revocation of token pairs

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};
use tracing::{debug, info, warn};

use crate::domain::entities::token::{RefreshTokenRecord, RefreshTokenState, TokenPair};
use crate::domain::entities::user::User;
use crate::errors::{DomainError, InvalidRefreshReason, TokenError};
use crate::repositories::{RefreshTokenRepository, UserRepository};

use super::clock::{Clock, SystemClock};
use super::config::TokenManagerConfig;
use super::generator::generate_refresh_secret;
use super::hasher::TokenHasher;
use super::signer::TokenSigner;

/// Single authority over the token lifecycle
///
/// A refresh token is accepted by `rotate_refresh_token` at most once. Every
/// refusal surfaces as `TokenError::InvalidRefreshToken`; any other error is an
/// infrastructure fault passed through unchanged.
#[async_trait]
pub trait TokenManager: Send + Sync {
    /// Issue a new access token and refresh token for a verified user
    async fn issue_token_pair(
        &self,
        user: &User,
        ip_address: Option<&str>,
        user_agent: Option<&str>,
    ) -> Result<TokenPair, DomainError>;

    /// Exchange a live refresh token for a new pair, consuming the old one
    async fn rotate_refresh_token(
        &self,
        refresh_token: &str,
        ip_address: Option<&str>,
        user_agent: Option<&str>,
    ) -> Result<TokenPair, DomainError>;

    /// Revoke a refresh token. Unknown or already revoked tokens are not an error.
    async fn revoke_refresh_token(
        &self,
        refresh_token: &str,
        ip_address: Option<&str>,
    ) -> Result<(), DomainError>;
}

/// [`TokenManager`] issuing RS256 access tokens and hashed, single-use refresh tokens
pub struct JwtTokenManager<R: RefreshTokenRepository, U: UserRepository> {
    tokens: Arc<R>,
    users: Arc<U>,
    signer: Arc<dyn TokenSigner>,
    hasher: Arc<dyn TokenHasher>,
    clock: Arc<dyn Clock>,
    config: TokenManagerConfig,
}

impl<R: RefreshTokenRepository, U: UserRepository> JwtTokenManager<R, U> {
    /// Creates a token manager reading wall-clock time
    ///
    /// # Arguments
    ///
    /// * `tokens` - Refresh-token store
    /// * `users` - User lookup used during rotation
    /// * `signer` - Access-token signer
    /// * `hasher` - Refresh-token hasher
    /// * `config` - Lifetimes; validated here
    pub fn new(
        tokens: Arc<R>,
        users: Arc<U>,
        signer: Arc<dyn TokenSigner>,
        hasher: Arc<dyn TokenHasher>,
        config: TokenManagerConfig,
    ) -> Result<Self, DomainError> {
        config.validate()?;
        Ok(Self {
            tokens,
            users,
            signer,
            hasher,
            clock: Arc::new(SystemClock),
            config,
        })
    }

    /// Replace the time source
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &TokenManagerConfig {
        &self.config
    }

    fn refuse(&self, reason: InvalidRefreshReason, hashed_token: &str) -> DomainError {
        warn!(
            reason = %reason,
            token_hash_prefix = hashed_token.get(..12).unwrap_or(hashed_token),
            "Refresh token refused"
        );
        TokenError::invalid_refresh(reason).into()
    }

    /// Classifies a token the live lookup did not return
    ///
    /// Only a record already expired at `now` is deleted; anything else is
    /// left for the cleanup task. Returns the refusal to surface; `Err` only
    /// for store failures.
    async fn refuse_unusable(
        &self,
        hashed_token: &str,
        now: DateTime<Utc>,
    ) -> Result<DomainError, DomainError> {
        match self.tokens.find_by_hash(hashed_token).await? {
            Some(stale) if stale.is_revoked() => {
                Ok(self.refuse(InvalidRefreshReason::Revoked, hashed_token))
            }
            Some(stale) if stale.is_expired(now) => {
                self.tokens.delete(&stale).await?;
                Ok(self.refuse(InvalidRefreshReason::Expired, hashed_token))
            }
            _ => Ok(self.refuse(InvalidRefreshReason::NotFound, hashed_token)),
        }
    }
}

#[async_trait]
impl<R: RefreshTokenRepository, U: UserRepository> TokenManager for JwtTokenManager<R, U> {
    async fn issue_token_pair(
        &self,
        user: &User,
        ip_address: Option<&str>,
        user_agent: Option<&str>,
    ) -> Result<TokenPair, DomainError> {
        // Whole seconds, so stored expiries match the JWT numeric dates.
        let issued_at = self.clock.now().trunc_subsecs(0);
        let access_expires_at = issued_at + self.config.access_token_ttl;
        let refresh_expires_at = issued_at + self.config.refresh_token_ttl;

        let claims = self
            .signer
            .build_payload(issued_at, access_expires_at, user.subject_claims());
        let access_token = self.signer.sign(&claims)?;

        let refresh_secret = generate_refresh_secret();
        let hashed_token = self.hasher.hash(&refresh_secret);

        let pair = TokenPair::new(
            access_token,
            refresh_secret,
            issued_at,
            access_expires_at,
            refresh_expires_at,
            user.roles.clone(),
        )?;

        let record = RefreshTokenRecord::new(
            user.subject_identifier(),
            hashed_token,
            refresh_expires_at,
            issued_at,
        )
        .with_request_metadata(ip_address, user_agent);
        self.tokens.save(&record).await?;

        info!(
            user_id = %user.id,
            record_id = %record.id(),
            jti = %claims.jti,
            ip = ip_address.unwrap_or("unknown"),
            "Token pair issued"
        );

        Ok(pair)
    }

    async fn rotate_refresh_token(
        &self,
        refresh_token: &str,
        ip_address: Option<&str>,
        user_agent: Option<&str>,
    ) -> Result<TokenPair, DomainError> {
        let now = self.clock.now();
        let hashed_token = self.hasher.hash(refresh_token);

        let Some(mut record) = self.tokens.find_valid_by_hash(&hashed_token, now).await? else {
            return Err(self.refuse_unusable(&hashed_token, now).await?);
        };

        // The store already filters on liveness; never trust that alone.
        match record.state(now) {
            RefreshTokenState::Live => {}
            RefreshTokenState::Expired => {
                self.tokens.delete(&record).await?;
                return Err(self.refuse(InvalidRefreshReason::Expired, &hashed_token));
            }
            RefreshTokenState::Revoked => {
                return Err(self.refuse(InvalidRefreshReason::Revoked, &hashed_token));
            }
        }

        let Some(user) = self.users.find_by_email(record.subject_identifier()).await? else {
            self.tokens.delete(&record).await?;
            return Err(self.refuse(InvalidRefreshReason::UserNotFound, &hashed_token));
        };

        // Consume the old token before issuing; losing this race means another
        // rotation already used it.
        record.mark_revoked(now);
        if !self.tokens.compare_and_revoke(&record).await? {
            return Err(self.refuse(InvalidRefreshReason::Revoked, &hashed_token));
        }
        debug!(record_id = %record.id(), "Previous refresh token consumed");

        let pair = self.issue_token_pair(&user, ip_address, user_agent).await?;

        info!(
            user_id = %user.id,
            rotated_record_id = %record.id(),
            ip = ip_address.unwrap_or("unknown"),
            "Refresh token rotated"
        );

        Ok(pair)
    }

    async fn revoke_refresh_token(
        &self,
        refresh_token: &str,
        ip_address: Option<&str>,
    ) -> Result<(), DomainError> {
        let hashed_token = self.hasher.hash(refresh_token);
        let revoked = self
            .tokens
            .revoke_by_hash(&hashed_token, self.clock.now())
            .await?;

        info!(
            revoked,
            ip = ip_address.unwrap_or("unknown"),
            "Refresh token revocation requested"
        );

        Ok(())
    }
}
