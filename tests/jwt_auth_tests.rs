// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JWT authentication tests.
//!
//! The identity layer issues session tokens; these tests verify that
//! tokens in its format decode cleanly with the middleware's Claims
//! shape, catching compatibility drift early.

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use studystreak::middleware::auth::{create_jwt, Claims};

#[test]
fn test_jwt_roundtrip() {
    let signing_key = b"test_signing_key_32_bytes_long!!";
    let user_id = "user_abc123";

    let token = create_jwt(user_id, signing_key).expect("Failed to create JWT");

    let key = DecodingKey::from_secret(signing_key);
    let validation = Validation::new(Algorithm::HS256);

    let token_data = decode::<Claims>(&token, &key, &validation)
        .expect("Failed to decode JWT - check Claims struct compatibility");

    assert_eq!(token_data.claims.sub, user_id);
    assert!(token_data.claims.exp > token_data.claims.iat);
}

#[test]
fn test_jwt_rejects_wrong_key() {
    let token = create_jwt("user_abc123", b"correct_key_32_bytes_long_here!!").unwrap();

    let key = DecodingKey::from_secret(b"wrong_key_32_bytes_long_here!!!!");
    let validation = Validation::new(Algorithm::HS256);

    assert!(decode::<Claims>(&token, &key, &validation).is_err());
}

#[test]
fn test_jwt_rejects_garbage() {
    let key = DecodingKey::from_secret(b"any_key");
    let validation = Validation::new(Algorithm::HS256);

    assert!(decode::<Claims>("not.a.jwt", &key, &validation).is_err());
}
