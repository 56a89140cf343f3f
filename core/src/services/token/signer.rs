//! Access-token signing

use std::sync::RwLock;

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, Header, Validation};

use crate::domain::entities::token::{Claims, SubjectClaims};
use crate::errors::TokenError;

use super::generator::generate_jti;
use super::key_manager::Rs256KeyManager;

/// Builds and signs access-token payloads
pub trait TokenSigner: Send + Sync {
    /// Merge registered claims (iss, aud, iat, nbf, exp, jti) with the subject claims
    fn build_payload(
        &self,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
        subject: SubjectClaims,
    ) -> Claims;

    /// Produce the compact `header.payload.signature` form
    fn sign(&self, claims: &Claims) -> Result<String, TokenError>;
}

/// RS256 signer over `jsonwebtoken`
///
/// Header is `{"typ":"JWT","alg":"RS256"}`; every segment is unpadded base64url.
pub struct JwtSigner {
    keys: RwLock<Rs256KeyManager>,
    issuer: String,
    audience: String,
}

impl JwtSigner {
    pub fn new(
        key_manager: Rs256KeyManager,
        issuer: impl Into<String>,
        audience: impl Into<String>,
    ) -> Self {
        Self {
            keys: RwLock::new(key_manager),
            issuer: issuer.into(),
            audience: audience.into(),
        }
    }

    /// Re-read file-based keys; tokens signed afterwards use the new key
    pub fn reload_keys(&self) -> Result<(), TokenError> {
        let mut keys = self.keys.write().map_err(|_| TokenError::KeyLoadError {
            message: "Key manager lock poisoned".to_string(),
        })?;
        keys.reload()?;
        tracing::info!("RS256 signing keys reloaded");
        Ok(())
    }

    /// Verifies an access token against the public key
    ///
    /// Checks signature, issuer, audience, `exp` and `nbf`.
    ///
    /// # Returns
    ///
    /// * `Ok(Claims)` - The decoded claims if valid
    /// * `Err(TokenError)` - Token is invalid, expired, or no public key is loaded
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let keys = self.keys.read().map_err(|_| TokenError::KeyLoadError {
            message: "Key manager lock poisoned".to_string(),
        })?;
        let decoding_key = keys.decoding_key().ok_or_else(|| TokenError::KeyLoadError {
            message: "No public key configured for verification".to_string(),
        })?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.validate_exp = true;
        validation.validate_nbf = true;

        decode::<Claims>(token, decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::TokenExpired,
                ErrorKind::ImmatureSignature => TokenError::TokenNotYetValid,
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                _ => TokenError::InvalidTokenFormat,
            })
    }
}

impl std::fmt::Debug for JwtSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtSigner")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .finish_non_exhaustive()
    }
}

impl TokenSigner for JwtSigner {
    fn build_payload(
        &self,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
        subject: SubjectClaims,
    ) -> Claims {
        Claims::new(
            self.issuer.clone(),
            self.audience.clone(),
            issued_at,
            expires_at,
            generate_jti(),
            subject,
        )
    }

    fn sign(&self, claims: &Claims) -> Result<String, TokenError> {
        let keys = self.keys.read().map_err(|_| TokenError::SigningError {
            message: "Key manager lock poisoned".to_string(),
        })?;

        encode(&Header::new(Algorithm::RS256), claims, keys.encoding_key()).map_err(|e| {
            TokenError::SigningError {
                message: format!("RS256 signing failed: {}", e),
            }
        })
    }
}
