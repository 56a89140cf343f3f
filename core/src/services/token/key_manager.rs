//! RS256 key management for access-token signing and verification

use std::fs;
use std::path::{Path, PathBuf};

use jsonwebtoken::{DecodingKey, EncodingKey};
use pkcs8::{EncryptedPrivateKeyInfo, PrivateKeyInfo, SecretDocument};
use tracing::warn;

use crate::errors::TokenError;

const ENCRYPTED_PKCS8_LABEL: &str = "ENCRYPTED PRIVATE KEY";
/// OpenSSL's pre-PKCS#8 encryption header on a PKCS#1 key
const LEGACY_ENCRYPTED_HEADER: &str = "Proc-Type: 4,ENCRYPTED";

/// Where the keys came from, so they can be re-read on rotation
#[derive(Clone)]
enum KeySource {
    Files {
        private_key_path: PathBuf,
        public_key_path: Option<PathBuf>,
        passphrase: Option<String>,
    },
    Memory,
}

/// Manager for RS256 keys used in JWT operations
#[derive(Clone)]
pub struct Rs256KeyManager {
    /// Private key for signing JWTs
    encoding_key: EncodingKey,
    /// Public key for verifying JWTs, if configured
    decoding_key: Option<DecodingKey>,
    source: KeySource,
}

impl std::fmt::Debug for Rs256KeyManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut debug = f.debug_struct("Rs256KeyManager");
        match &self.source {
            KeySource::Files {
                private_key_path,
                public_key_path,
                passphrase,
            } => debug
                .field("private_key_path", private_key_path)
                .field("public_key_path", public_key_path)
                .field("encrypted", &passphrase.is_some()),
            KeySource::Memory => debug.field("source", &"memory"),
        };
        debug.field("can_verify", &self.decoding_key.is_some()).finish()
    }
}

impl Rs256KeyManager {
    /// Creates a key manager from key files
    ///
    /// # Arguments
    ///
    /// * `private_key_path` - PEM private key (PKCS#1, PKCS#8 or encrypted PKCS#8)
    /// * `public_key_path` - PEM public key; without it tokens can be signed but not verified
    /// * `passphrase` - Required when the private key is encrypted
    ///
    /// # Returns
    ///
    /// * `Ok(Rs256KeyManager)` - Keys loaded
    /// * `Err(TokenError::KeyLoadError)` - A file is unreadable or malformed, or the passphrase is wrong
    pub fn from_files<P: AsRef<Path>>(
        private_key_path: P,
        public_key_path: Option<P>,
        passphrase: Option<&str>,
    ) -> Result<Self, TokenError> {
        let private_key_path = private_key_path.as_ref().to_path_buf();
        let public_key_path = public_key_path.map(|p| p.as_ref().to_path_buf());

        let private_key_pem = fs::read(&private_key_path).map_err(|e| TokenError::KeyLoadError {
            message: format!("Failed to read private key {}: {}", private_key_path.display(), e),
        })?;
        let encoding_key = load_encoding_key(&private_key_pem, passphrase)?;

        let decoding_key = match &public_key_path {
            Some(path) => {
                let public_key_pem = fs::read(path).map_err(|e| TokenError::KeyLoadError {
                    message: format!("Failed to read public key {}: {}", path.display(), e),
                })?;
                Some(load_decoding_key(&public_key_pem)?)
            }
            None => None,
        };

        Ok(Self {
            encoding_key,
            decoding_key,
            source: KeySource::Files {
                private_key_path,
                public_key_path,
                passphrase: passphrase.map(str::to_string),
            },
        })
    }

    /// Creates a key manager from PEM strings (useful for testing or embedded keys)
    pub fn from_pem_strings(
        private_key_pem: &str,
        public_key_pem: Option<&str>,
        passphrase: Option<&str>,
    ) -> Result<Self, TokenError> {
        let encoding_key = load_encoding_key(private_key_pem.as_bytes(), passphrase)?;
        let decoding_key = public_key_pem
            .map(|pem| load_decoding_key(pem.as_bytes()))
            .transpose()?;

        Ok(Self {
            encoding_key,
            decoding_key,
            source: KeySource::Memory,
        })
    }

    /// Returns the encoding key for signing JWTs
    pub fn encoding_key(&self) -> &EncodingKey {
        &self.encoding_key
    }

    /// Returns the decoding key for verifying JWTs, if a public key was loaded
    pub fn decoding_key(&self) -> Option<&DecodingKey> {
        self.decoding_key.as_ref()
    }

    /// Re-reads file-based keys (key rotation). Keys built from strings are left as they are.
    ///
    /// On failure the current keys stay in place.
    pub fn reload(&mut self) -> Result<(), TokenError> {
        let KeySource::Files {
            private_key_path,
            public_key_path,
            passphrase,
        } = &self.source
        else {
            return Ok(());
        };

        let fresh = Self::from_files(
            private_key_path.as_path(),
            public_key_path.as_deref(),
            passphrase.as_deref(),
        )?;
        *self = fresh;
        Ok(())
    }
}

fn load_encoding_key(pem: &[u8], passphrase: Option<&str>) -> Result<EncodingKey, TokenError> {
    let text = std::str::from_utf8(pem).map_err(|_| TokenError::KeyLoadError {
        message: "Private key is not valid PEM text".to_string(),
    })?;

    if text.contains(LEGACY_ENCRYPTED_HEADER) {
        return Err(TokenError::KeyLoadError {
            message: "Legacy OpenSSL-encrypted PEM keys are not supported; \
                      convert with `openssl pkcs8 -topk8 -v2 aes-256-cbc`"
                .to_string(),
        });
    }

    if !text.contains(ENCRYPTED_PKCS8_LABEL) {
        if passphrase.is_some() {
            warn!("Passphrase configured but private key is not encrypted; ignoring it");
        }
        return EncodingKey::from_rsa_pem(pem).map_err(|e| TokenError::KeyLoadError {
            message: format!("Invalid private key format: {}", e),
        });
    }

    let passphrase = passphrase.ok_or_else(|| TokenError::KeyLoadError {
        message: "Private key is encrypted but no passphrase is configured".to_string(),
    })?;

    let (label, document) = SecretDocument::from_pem(text).map_err(|e| TokenError::KeyLoadError {
        message: format!("Invalid encrypted private key PEM: {}", e),
    })?;
    if label != ENCRYPTED_PKCS8_LABEL {
        return Err(TokenError::KeyLoadError {
            message: format!("Unexpected PEM label: {}", label),
        });
    }

    let encrypted = EncryptedPrivateKeyInfo::try_from(document.as_bytes()).map_err(|e| {
        TokenError::KeyLoadError {
            message: format!("Invalid encrypted private key: {}", e),
        }
    })?;
    let decrypted = encrypted.decrypt(passphrase).map_err(|_| TokenError::KeyLoadError {
        message: "Failed to decrypt private key (wrong passphrase?)".to_string(),
    })?;
    let info = PrivateKeyInfo::try_from(decrypted.as_bytes()).map_err(|e| {
        TokenError::KeyLoadError {
            message: format!("Invalid decrypted private key: {}", e),
        }
    })?;

    // PKCS#8 wraps the PKCS#1 RSAPrivateKey that `from_rsa_der` expects.
    Ok(EncodingKey::from_rsa_der(info.private_key))
}

fn load_decoding_key(pem: &[u8]) -> Result<DecodingKey, TokenError> {
    DecodingKey::from_rsa_pem(pem).map_err(|e| TokenError::KeyLoadError {
        message: format!("Invalid public key format: {}", e),
    })
}
