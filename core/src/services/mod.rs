//! Business services containing domain logic.

pub mod token;

// Re-export commonly used types
pub use token::{
    JwtSigner, JwtTokenManager, PepperedSha512Hasher, Rs256KeyManager, TokenCleanupService,
    TokenManager, TokenManagerConfig,
};
