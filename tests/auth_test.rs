//! Bearer-token verification with the HS256 shared-secret verifier.
//!
//! Mints JWTs locally; no running server or Supabase project is needed.
//!
//! Run with: `cargo test --test auth_test`
use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use uuid::Uuid;

use gigflow_backend::auth::jwt::{Claims, UserMetadata};
use gigflow_backend::auth::middleware::authenticate;
use gigflow_backend::auth::{AuthError, TokenVerifier};

/// A fake secret for testing: never use the real one in tests committed to git.
const TEST_SECRET: &str = "test-secret-at-least-256-bits-long-for-hs256-xxxxxxx";

fn claims(sub: &str, exp_offset: i64) -> Claims {
    let now = Utc::now().timestamp();

    Claims {
        sub: sub.to_string(),
        exp: (now + exp_offset) as usize,
        iat: Some(now as usize),
        iss: Some("https://example.supabase.co/auth/v1".to_string()),
        email: Some("alice@example.com".to_string()),
        role: Some("authenticated".to_string()),
        user_metadata: Some(UserMetadata {
            full_name: Some("Alice Smith".to_string()),
            name: None,
        }),
    }
}

fn mint(claims: &Claims, secret: &str) -> String {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("Failed to encode test JWT")
}

fn verifier() -> TokenVerifier {
    TokenVerifier::Secret(TEST_SECRET.to_string())
}

#[tokio::test]
async fn valid_token_yields_the_caller_identity() {
    let user_id = Uuid::new_v4();
    let token = mint(&claims(&user_id.to_string(), 3600), TEST_SECRET);

    let identity = authenticate(&verifier(), &token).await.expect("Token should be valid");

    assert_eq!(identity.id, user_id);
    assert_eq!(identity.email.as_deref(), Some("alice@example.com"));
    assert_eq!(identity.display_name.as_deref(), Some("Alice Smith"));
}

#[tokio::test]
async fn expired_token_is_rejected() {
    // Well past the 60s default leeway.
    let token = mint(&claims(&Uuid::new_v4().to_string(), -300), TEST_SECRET);

    match verifier().verify(&token).await {
        Err(AuthError::InvalidToken(e)) => assert!(matches!(e.kind(), ErrorKind::ExpiredSignature)),
        other => panic!("expected an expired token error, got {other:?}"),
    }
}

#[tokio::test]
async fn wrong_secret_is_rejected() {
    let token = mint(
        &claims(&Uuid::new_v4().to_string(), 3600),
        "completely-wrong-secret-xxxxxxxxxxxxxxxxxxx",
    );

    match verifier().verify(&token).await {
        Err(AuthError::InvalidToken(e)) => assert!(matches!(e.kind(), ErrorKind::InvalidSignature)),
        other => panic!("expected a signature error, got {other:?}"),
    }
}

#[tokio::test]
async fn garbage_token_is_rejected() {
    assert!(verifier().verify("not.a.valid.jwt").await.is_err());
}

#[tokio::test]
async fn non_uuid_subject_is_rejected() {
    let token = mint(&claims("service-account", 3600), TEST_SECRET);

    let err = authenticate(&verifier(), &token).await.unwrap_err();
    assert!(matches!(err, AuthError::InvalidSubject(_)));
}

#[test]
fn display_name_falls_back_to_name() {
    let mut claims = claims(&Uuid::new_v4().to_string(), 3600);
    claims.user_metadata = Some(UserMetadata {
        full_name: None,
        name: Some("alice".to_string()),
    });
    assert_eq!(claims.display_name().as_deref(), Some("alice"));

    claims.user_metadata = None;
    assert!(claims.display_name().is_none());
}
