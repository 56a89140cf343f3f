//! Unit tests for RS256 signing and verification

use chrono::{Duration, Utc};
use jsonwebtoken::{decode_header, Algorithm};

use super::support::{signer, student, AUDIENCE, ISSUER, OTHER_PUBLIC_KEY_PEM, PRIVATE_KEY_PEM};
use crate::errors::TokenError;
use crate::services::token::{JwtSigner, Rs256KeyManager, TokenSigner};

fn signed_now(signer: &JwtSigner, ttl: Duration) -> String {
    let now = Utc::now();
    let claims = signer.build_payload(now, now + ttl, student().subject_claims());
    signer.sign(&claims).unwrap()
}

#[test]
fn test_build_payload_sets_registered_claims() {
    let signer = signer();
    let now = Utc::now();
    let subject = student().subject_claims();

    let claims = signer.build_payload(now, now + Duration::seconds(900), subject.clone());

    assert_eq!(claims.iss, ISSUER);
    assert_eq!(claims.aud, AUDIENCE);
    assert_eq!(claims.iat, now.timestamp());
    assert_eq!(claims.nbf, now.timestamp());
    assert_eq!(claims.exp, now.timestamp() + 900);
    assert_eq!(claims.subject, subject);
}

#[test]
fn test_each_payload_gets_fresh_jti() {
    let signer = signer();
    let now = Utc::now();

    let a = signer.build_payload(now, now + Duration::seconds(60), student().subject_claims());
    let b = signer.build_payload(now, now + Duration::seconds(60), student().subject_claims());

    assert_ne!(a.jti, b.jti);
}

#[test]
fn test_compact_form_is_unpadded_base64url() {
    let token = signed_now(&signer(), Duration::seconds(900));

    let segments: Vec<&str> = token.split('.').collect();
    assert_eq!(segments.len(), 3);
    for segment in segments {
        assert!(!segment.is_empty());
        assert!(segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    let header = decode_header(&token).unwrap();
    assert_eq!(header.alg, Algorithm::RS256);
    assert_eq!(header.typ.as_deref(), Some("JWT"));
}

#[test]
fn test_verify_round_trips_claims() {
    let signer = signer();
    let now = Utc::now();
    let claims = signer.build_payload(now, now + Duration::seconds(900), student().subject_claims());
    let token = signer.sign(&claims).unwrap();

    assert_eq!(signer.verify(&token).unwrap(), claims);
}

#[test]
fn test_verify_rejects_expired_token() {
    let signer = signer();
    let issued = Utc::now() - Duration::hours(2);
    let claims = signer.build_payload(issued, issued + Duration::hours(1), student().subject_claims());
    let token = signer.sign(&claims).unwrap();

    assert!(matches!(signer.verify(&token), Err(TokenError::TokenExpired)));
}

#[test]
fn test_verify_rejects_other_key() {
    let token = signed_now(&signer(), Duration::seconds(900));
    let keys =
        Rs256KeyManager::from_pem_strings(PRIVATE_KEY_PEM, Some(OTHER_PUBLIC_KEY_PEM), None).unwrap();
    let verifier = JwtSigner::new(keys, ISSUER, AUDIENCE);

    assert!(matches!(verifier.verify(&token), Err(TokenError::InvalidSignature)));
}

#[test]
fn test_verify_rejects_tampered_payload() {
    let signer = signer();
    let token = signed_now(&signer, Duration::seconds(900));
    let other = signed_now(&signer, Duration::seconds(1800));

    let mut parts: Vec<&str> = token.split('.').collect();
    let other_parts: Vec<&str> = other.split('.').collect();
    parts[1] = other_parts[1];
    let forged = parts.join(".");

    assert!(matches!(signer.verify(&forged), Err(TokenError::InvalidSignature)));
    assert!(matches!(signer.verify("not.a.jwt"), Err(TokenError::InvalidTokenFormat)));
}

#[test]
fn test_verify_rejects_wrong_audience() {
    let token = signed_now(&signer(), Duration::seconds(900));
    let keys = Rs256KeyManager::from_pem_strings(
        PRIVATE_KEY_PEM,
        Some(super::support::PUBLIC_KEY_PEM),
        None,
    )
    .unwrap();
    let verifier = JwtSigner::new(keys, ISSUER, "another-api");

    assert!(matches!(verifier.verify(&token), Err(TokenError::InvalidTokenFormat)));
}

#[test]
fn test_verify_without_public_key() {
    let keys = Rs256KeyManager::from_pem_strings(PRIVATE_KEY_PEM, None, None).unwrap();
    let signer = JwtSigner::new(keys, ISSUER, AUDIENCE);
    let token = signed_now(&signer, Duration::seconds(900));

    assert!(matches!(signer.verify(&token), Err(TokenError::KeyLoadError { .. })));
}

#[test]
fn test_reload_keys_from_memory_is_noop() {
    let signer = signer();
    signer.reload_keys().unwrap();

    let token = signed_now(&signer, Duration::seconds(900));
    assert!(signer.verify(&token).is_ok());
}
