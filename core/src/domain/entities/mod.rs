//! Domain entities representing core business objects.

pub mod token;
pub mod user;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use token::{
    Claims, RefreshTokenRecord, RefreshTokenRow, RefreshTokenState, SubjectClaims, TokenPair,
    TOKEN_TYPE_BEARER,
};
pub use user::{User, ROLE_USER};
