//! Cryptographically secure random identifiers

use rand::rngs::OsRng;
use rand::RngCore;

/// Bytes of entropy in a refresh-token secret
pub const REFRESH_SECRET_BYTES: usize = 64;

/// Bytes of entropy in a `jti` claim
pub const JTI_BYTES: usize = 16;

/// New refresh-token secret: 64 bytes from the OS CSPRNG, hex encoded
pub fn generate_refresh_secret() -> String {
    random_hex(REFRESH_SECRET_BYTES)
}

/// New token identifier: 16 bytes from the OS CSPRNG, hex encoded
pub fn generate_jti() -> String {
    random_hex(JTI_BYTES)
}

fn random_hex(len: usize) -> String {
    let mut bytes = vec![0u8; len];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_lengths() {
        assert_eq!(generate_refresh_secret().len(), REFRESH_SECRET_BYTES * 2);
        assert_eq!(generate_jti().len(), JTI_BYTES * 2);
    }

    #[test]
    fn test_no_repeats() {
        let secrets: HashSet<String> = (0..1000).map(|_| generate_refresh_secret()).collect();
        assert_eq!(secrets.len(), 1000);

        let ids: HashSet<String> = (0..1000).map(|_| generate_jti()).collect();
        assert_eq!(ids.len(), 1000);
    }
}
