/*
 * Responsibility
 * - test 共通の fixture
 *  - token の発行 (HS256)
 *  - CredentialCodec / in-memory AppState の組み立て
 *  - response body の読み出し
 */
use std::sync::Arc;

use axum::response::Response;
use http_body_util::BodyExt;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::Serialize;
use serde_json::json;

use crate::repos::memory::{InMemoryNoteRepository, InMemoryUserRepository};
use crate::services::auth::credential::{CredentialCodec, VerificationKey, VerificationPolicy};
use crate::services::id_codec::IdCodec;
use crate::state::AppState;

pub const TEST_SECRET: &str = "test-secret-not-for-production";

pub fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

pub fn sign_hs256<T: Serialize>(claims: &T, secret: &str) -> String {
    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

pub fn token_for(sub: &str) -> String {
    sign_hs256(&json!({ "sub": sub, "exp": now() + 600 }), TEST_SECRET)
}

/// Expired well past the default leeway.
pub fn expired_token_for(sub: &str) -> String {
    sign_hs256(
        &json!({ "sub": sub, "exp": now() - 3600, "iat": now() - 7200 }),
        TEST_SECRET,
    )
}

pub fn codec() -> Arc<CredentialCodec> {
    let policy = VerificationPolicy {
        leeway_seconds: 60,
        ..VerificationPolicy::default()
    };
    Arc::new(CredentialCodec::new(&VerificationKey::Secret(TEST_SECRET.to_string()), &policy).unwrap())
}

/// `AppState` over in-memory repositories; the user repo is returned for seeding.
pub fn memory_state() -> (AppState, Arc<InMemoryUserRepository>) {
    let users = Arc::new(InMemoryUserRepository::default());
    let notes = Arc::new(InMemoryNoteRepository::new(users.clone()));
    let id_codec = IdCodec::new(
        10,
        "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789",
    )
    .unwrap();

    let state = AppState::new(users.clone(), notes, id_codec, codec());
    (state, users)
}

pub async fn body_string(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
