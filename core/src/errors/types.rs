//! Token error taxonomy
//!
//! Every failure the token lifecycle can surface to a caller is one of these
//! variants. Display texts are generic; the precise cause is kept
//! in associated data so it can be logged without reaching the client.

use std::fmt;

use edu_shared::errors::{error_codes, ErrorResponse};
use thiserror::Error;

/// Why a presented refresh token was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidRefreshReason {
    /// No live record matches the hash
    NotFound,
    /// The record exists but its expiry has passed
    Expired,
    /// The record was revoked by logout or a previous rotation
    Revoked,
    /// The record's subject no longer resolves to a user
    UserNotFound,
}

impl InvalidRefreshReason {
    /// Short, log-friendly description
    pub fn describe(&self) -> &'static str {
        match self {
            InvalidRefreshReason::NotFound => "invalid or expired",
            InvalidRefreshReason::Expired => "expired",
            InvalidRefreshReason::Revoked => "revoked",
            InvalidRefreshReason::UserNotFound => "associated user not found",
        }
    }
}

impl fmt::Display for InvalidRefreshReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// Token-related errors
#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Invalid refresh token")]
    InvalidRefreshToken { reason: InvalidRefreshReason },

    #[error("Token signing failed")]
    SigningError { message: String },

    #[error("Signing key unavailable")]
    KeyLoadError { message: String },

    #[error("Invalid token pair: {message}")]
    InvalidTokenPair { message: String },

    #[error("Token expired")]
    TokenExpired,

    #[error("Token not yet valid")]
    TokenNotYetValid,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Invalid token format")]
    InvalidTokenFormat,
}

impl TokenError {
    /// Shorthand for an `InvalidRefreshToken` with the given reason
    pub fn invalid_refresh(reason: InvalidRefreshReason) -> Self {
        TokenError::InvalidRefreshToken { reason }
    }

    /// Machine-readable code for the error body
    pub fn error_code(&self) -> &'static str {
        match self {
            TokenError::InvalidRefreshToken { .. } => error_codes::INVALID_REFRESH_TOKEN,
            TokenError::SigningError { .. } | TokenError::KeyLoadError { .. } => {
                error_codes::TOKEN_SIGNING_ERROR
            }
            TokenError::InvalidTokenPair { .. } => error_codes::INTERNAL_ERROR,
            TokenError::TokenExpired => error_codes::TOKEN_EXPIRED,
            TokenError::TokenNotYetValid
            | TokenError::InvalidSignature
            | TokenError::InvalidTokenFormat => error_codes::TOKEN_INVALID,
        }
    }

    /// HTTP status the presentation layer should answer with
    pub fn status_code(&self) -> u16 {
        if self.is_client_error() {
            401
        } else {
            500
        }
    }

    /// True for failures caused by the presented credential rather than the server
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            TokenError::InvalidRefreshToken { .. }
                | TokenError::TokenExpired
                | TokenError::TokenNotYetValid
                | TokenError::InvalidSignature
                | TokenError::InvalidTokenFormat
        )
    }

    /// Internal detail suitable for logs, never for clients in production
    pub fn detail(&self) -> Option<String> {
        match self {
            TokenError::InvalidRefreshToken { reason } => Some(reason.to_string()),
            TokenError::SigningError { message }
            | TokenError::KeyLoadError { message }
            | TokenError::InvalidTokenPair { message } => Some(message.clone()),
            _ => None,
        }
    }

    /// Builds the response body; internal detail is attached only when allowed
    pub fn to_response(&self, expose_details: bool) -> ErrorResponse {
        let response = ErrorResponse::new(self.error_code(), self.to_string(), self.status_code());
        match self.detail() {
            // The refusal reason stays server-side regardless of environment.
            Some(detail) if expose_details && !self.is_client_error() => {
                response.add_detail("cause", detail)
            }
            _ => response,
        }
    }
}

impl From<TokenError> for ErrorResponse {
    fn from(error: TokenError) -> Self {
        error.to_response(false)
    }
}
