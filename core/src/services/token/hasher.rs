//! One-way hashing of refresh-token secrets

use sha2::{Digest, Sha512};

/// Deterministic one-way hash used to store and look up refresh tokens
///
/// Refresh secrets carry 512 bits of entropy, so a fast keyed hash is enough;
/// this runs on every rotation and must not be an adaptive password hash.
pub trait TokenHasher: Send + Sync {
    fn hash(&self, secret: &str) -> String;
}

/// SHA-512 over `secret || pepper`, hex encoded (128 characters)
#[derive(Clone)]
pub struct PepperedSha512Hasher {
    pepper: String,
}

impl PepperedSha512Hasher {
    pub fn new(pepper: impl Into<String>) -> Self {
        Self {
            pepper: pepper.into(),
        }
    }
}

impl std::fmt::Debug for PepperedSha512Hasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PepperedSha512Hasher").finish_non_exhaustive()
    }
}

impl TokenHasher for PepperedSha512Hasher {
    fn hash(&self, secret: &str) -> String {
        let mut hasher = Sha512::new();
        hasher.update(secret.as_bytes());
        hasher.update(self.pepper.as_bytes());
        hex::encode(hasher.finalize())
    }
}
