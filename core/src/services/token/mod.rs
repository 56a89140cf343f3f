//! Token lifecycle services
//!
//! - RS256 access-token signing and verification
//! - Refresh-token generation, hashing, rotation and revocation
//! - Background cleanup of dead refresh-token records

mod cleanup;
mod clock;
mod config;
mod generator;
mod hasher;
mod key_manager;
mod manager;
mod signer;

#[cfg(test)]
mod tests;

pub use cleanup::{CleanupResult, TokenCleanupConfig, TokenCleanupService};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::TokenManagerConfig;
pub use generator::{generate_jti, generate_refresh_secret, JTI_BYTES, REFRESH_SECRET_BYTES};
pub use hasher::{PepperedSha512Hasher, TokenHasher};
pub use key_manager::Rs256KeyManager;
pub use manager::{JwtTokenManager, TokenManager};
pub use signer::{JwtSigner, TokenSigner};
