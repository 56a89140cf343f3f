//! Configuration for the token manager

use chrono::Duration;
use edu_shared::config::JwtConfig;

use crate::errors::DomainError;

/// Lifetimes and registered claims used when issuing token pairs
#[derive(Debug, Clone)]
pub struct TokenManagerConfig {
    /// Access token lifetime
    pub access_token_ttl: Duration,
    /// Refresh token lifetime
    pub refresh_token_ttl: Duration,
    /// `iss` claim
    pub issuer: String,
    /// `aud` claim
    pub audience: String,
}

impl Default for TokenManagerConfig {
    fn default() -> Self {
        Self {
            access_token_ttl: Duration::seconds(900),
            refresh_token_ttl: Duration::seconds(604800),
            issuer: "edusuite".to_string(),
            audience: "edusuite-api".to_string(),
        }
    }
}

impl TokenManagerConfig {
    /// Derive from the shared JWT configuration
    pub fn from_jwt_config(jwt: &JwtConfig) -> Result<Self, DomainError> {
        let config = Self {
            access_token_ttl: Duration::seconds(jwt.access_token_expiry),
            refresh_token_ttl: Duration::seconds(jwt.refresh_token_expiry),
            issuer: jwt.issuer.clone(),
            audience: jwt.audience.clone(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Both lifetimes positive, access strictly shorter than refresh
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.access_token_ttl <= Duration::zero() || self.refresh_token_ttl <= Duration::zero() {
            return Err(DomainError::Validation {
                message: "token lifetimes must be positive".to_string(),
            });
        }
        if self.access_token_ttl >= self.refresh_token_ttl {
            return Err(DomainError::Validation {
                message: "access token lifetime must be shorter than refresh token lifetime".to_string(),
            });
        }
        Ok(())
    }
}
