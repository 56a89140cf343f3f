//! Shared fixtures for token service tests

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use crate::domain::entities::user::User;
use crate::repositories::{InMemoryRefreshTokenRepository, InMemoryUserRepository};
use crate::services::token::{
    JwtSigner, JwtTokenManager, ManualClock, PepperedSha512Hasher, Rs256KeyManager,
    TokenManagerConfig,
};

pub const PRIVATE_KEY_PEM: &str = include_str!("../../../../keys/test_private_key.pem");
pub const PRIVATE_KEY_PKCS1_PEM: &str = include_str!("../../../../keys/test_private_key_pkcs1.pem");
pub const ENCRYPTED_PRIVATE_KEY_PEM: &str =
    include_str!("../../../../keys/test_private_key_encrypted.pem");
pub const LEGACY_ENCRYPTED_PRIVATE_KEY_PEM: &str =
    include_str!("../../../../keys/test_private_key_legacy_encrypted.pem");
pub const PUBLIC_KEY_PEM: &str = include_str!("../../../../keys/test_public_key.pem");
pub const OTHER_PUBLIC_KEY_PEM: &str = include_str!("../../../../keys/other_public_key.pem");

pub const KEY_PASSPHRASE: &str = "test-passphrase";
pub const PEPPER: &str = "unit-test-pepper";
pub const ISSUER: &str = "edusuite";
pub const AUDIENCE: &str = "edusuite-api";

pub fn keys_dir() -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("keys")
}

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
}

pub fn signer() -> JwtSigner {
    let keys = Rs256KeyManager::from_pem_strings(PRIVATE_KEY_PEM, Some(PUBLIC_KEY_PEM), None)
        .expect("test keys load");
    JwtSigner::new(keys, ISSUER, AUDIENCE)
}

pub fn student() -> User {
    User::new(
        Uuid::new_v4(),
        "ana@school.test",
        vec!["ROLE_STUDENT".to_string()],
    )
}

pub type Manager = JwtTokenManager<InMemoryRefreshTokenRepository, InMemoryUserRepository>;

/// A manager over in-memory stores with a clock pinned at `t0`
pub struct Harness {
    pub manager: Manager,
    pub tokens: Arc<InMemoryRefreshTokenRepository>,
    pub users: Arc<InMemoryUserRepository>,
    pub signer: Arc<JwtSigner>,
    pub hasher: Arc<PepperedSha512Hasher>,
    pub clock: Arc<ManualClock>,
    pub user: User,
}

impl Harness {
    pub async fn new() -> Self {
        let tokens = Arc::new(InMemoryRefreshTokenRepository::new());
        let users = Arc::new(InMemoryUserRepository::new());
        let signer = Arc::new(signer());
        let hasher = Arc::new(PepperedSha512Hasher::new(PEPPER));
        let clock = Arc::new(ManualClock::new(t0()));

        let user = student();
        users.insert(user.clone()).await;

        let manager = JwtTokenManager::new(
            tokens.clone(),
            users.clone(),
            signer.clone(),
            hasher.clone(),
            TokenManagerConfig::default(),
        )
        .expect("default config is valid")
        .with_clock(clock.clone());

        Self {
            manager,
            tokens,
            users,
            signer,
            hasher,
            clock,
            user,
        }
    }
}
