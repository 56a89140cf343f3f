//! # EduSuite Core
//!
//! Token lifecycle for the EduSuite backend: RS256 access tokens and hashed,
//! single-use refresh tokens. Contains the domain entities, the store and user
//! lookup contracts, and the services that enforce rotation and revocation.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::{
    Claims, RefreshTokenRecord, RefreshTokenRow, RefreshTokenState, SubjectClaims, TokenPair,
    TokenPairResponse, User, ROLE_USER, TOKEN_TYPE_BEARER,
};
pub use errors::{DomainError, DomainResult, InvalidRefreshReason, TokenError};
pub use repositories::{
    InMemoryRefreshTokenRepository, InMemoryUserRepository, RefreshTokenRepository,
    UserRepository,
};
pub use services::{
    JwtSigner, JwtTokenManager, PepperedSha512Hasher, Rs256KeyManager, TokenCleanupService,
    TokenManager, TokenManagerConfig,
};
