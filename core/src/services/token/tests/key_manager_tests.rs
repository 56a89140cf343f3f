//! Unit tests for loading RS256 keys

use super::support::{
    keys_dir, ENCRYPTED_PRIVATE_KEY_PEM, KEY_PASSPHRASE, LEGACY_ENCRYPTED_PRIVATE_KEY_PEM,
    PRIVATE_KEY_PEM, PRIVATE_KEY_PKCS1_PEM, PUBLIC_KEY_PEM,
};
use crate::errors::TokenError;
use crate::services::token::Rs256KeyManager;

fn assert_key_load_error(result: Result<Rs256KeyManager, TokenError>) {
    match result {
        Err(TokenError::KeyLoadError { .. }) => {}
        other => panic!("expected KeyLoadError, got {:?}", other),
    }
}

#[test]
fn test_loads_pkcs8_key() {
    let keys = Rs256KeyManager::from_pem_strings(PRIVATE_KEY_PEM, Some(PUBLIC_KEY_PEM), None).unwrap();
    assert!(keys.decoding_key().is_some());
}

#[test]
fn test_loads_pkcs1_key() {
    let keys = Rs256KeyManager::from_pem_strings(PRIVATE_KEY_PKCS1_PEM, None, None).unwrap();
    assert!(keys.decoding_key().is_none());
}

#[test]
fn test_loads_encrypted_key_with_passphrase() {
    let result = Rs256KeyManager::from_pem_strings(
        ENCRYPTED_PRIVATE_KEY_PEM,
        Some(PUBLIC_KEY_PEM),
        Some(KEY_PASSPHRASE),
    );
    assert!(result.is_ok());
}

#[test]
fn test_encrypted_key_needs_passphrase() {
    assert_key_load_error(Rs256KeyManager::from_pem_strings(
        ENCRYPTED_PRIVATE_KEY_PEM,
        None,
        None,
    ));
}

#[test]
fn test_encrypted_key_rejects_wrong_passphrase() {
    assert_key_load_error(Rs256KeyManager::from_pem_strings(
        ENCRYPTED_PRIVATE_KEY_PEM,
        None,
        Some("not-the-passphrase"),
    ));
}

#[test]
fn test_rejects_legacy_encrypted_pkcs1_key() {
    let result = Rs256KeyManager::from_pem_strings(
        LEGACY_ENCRYPTED_PRIVATE_KEY_PEM,
        None,
        Some(KEY_PASSPHRASE),
    );

    match result {
        Err(TokenError::KeyLoadError { message }) => {
            assert!(message.contains("Legacy"), "unexpected message: {}", message);
            assert!(message.contains("openssl pkcs8 -topk8"));
        }
        other => panic!("expected KeyLoadError, got {:?}", other),
    }
}

#[test]
fn test_unencrypted_key_ignores_passphrase() {
    let keys = Rs256KeyManager::from_pem_strings(
        PRIVATE_KEY_PEM,
        Some(PUBLIC_KEY_PEM),
        Some(KEY_PASSPHRASE),
    )
    .unwrap();
    assert!(keys.decoding_key().is_some());
}

#[test]
fn test_rejects_garbage() {
    assert_key_load_error(Rs256KeyManager::from_pem_strings("not a key", None, None));
    assert_key_load_error(Rs256KeyManager::from_pem_strings(
        PRIVATE_KEY_PEM,
        Some("not a key"),
        None,
    ));
}

#[test]
fn test_from_files() {
    let dir = keys_dir();
    let keys = Rs256KeyManager::from_files(
        dir.join("test_private_key_encrypted.pem"),
        Some(dir.join("test_public_key.pem")),
        Some(KEY_PASSPHRASE),
    )
    .unwrap();

    assert!(keys.decoding_key().is_some());
    let debug = format!("{:?}", keys);
    assert!(debug.contains("test_private_key_encrypted.pem"));
    assert!(!debug.contains(KEY_PASSPHRASE));
}

#[test]
fn test_from_files_missing_file() {
    let dir = keys_dir();
    assert_key_load_error(Rs256KeyManager::from_files(
        dir.join("missing.pem"),
        None,
        None,
    ));
}

#[test]
fn test_reload_from_files() {
    let dir = keys_dir();
    let mut keys = Rs256KeyManager::from_files(
        dir.join("test_private_key.pem"),
        Some(dir.join("test_public_key.pem")),
        None,
    )
    .unwrap();

    keys.reload().unwrap();
    assert!(keys.decoding_key().is_some());
}
