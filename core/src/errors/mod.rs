//! Domain-specific error types and error handling.

mod types;


pub use types::{InvalidRefreshReason, TokenError};

use edu_shared::errors::{error_codes, ErrorResponse, IntoErrorResponse};
use thiserror::Error;

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    /// Infrastructure fault (store unreachable, constraint violation, ...)
    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Token(#[from] TokenError),
}

impl DomainError {
    /// True when the error is a refused refresh token
    pub fn is_invalid_refresh_token(&self) -> bool {
        matches!(self, DomainError::Token(TokenError::InvalidRefreshToken { .. }))
    }

    /// HTTP status the presentation layer should answer with
    pub fn status_code(&self) -> u16 {
        match self {
            DomainError::Validation { .. } => 400,
            DomainError::NotFound { .. } => 404,
            DomainError::Internal { .. } => 500,
            DomainError::Token(e) => e.status_code(),
        }
    }
}

impl IntoErrorResponse for DomainError {
    fn to_error_response(&self, expose_details: bool) -> ErrorResponse {
        match self {
            DomainError::Token(e) => e.to_response(expose_details),
            DomainError::Validation { message } => {
                ErrorResponse::new(error_codes::VALIDATION_ERROR, message.clone(), 400)
            }
            DomainError::NotFound { resource } => ErrorResponse::new(
                error_codes::NOT_FOUND,
                format!("{} not found", resource),
                404,
            ),
            DomainError::Internal { message } => {
                let response =
                    ErrorResponse::new(error_codes::INTERNAL_ERROR, "Internal server error", 500);
                if expose_details {
                    response.add_detail("cause", message)
                } else {
                    response
                }
            }
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
