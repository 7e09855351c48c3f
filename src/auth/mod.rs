//! Bearer-token identity. Supplies the authenticated user id to every
//! mutating call; it makes no authorization decisions itself.

pub mod jwks;
pub mod jwt;
pub mod middleware;

use thiserror::Error;

use crate::config::AuthConfig;
use jwks::JwksCache;
use jwt::Claims;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing Authorization header")]
    MissingHeader,

    #[error("Authorization header must be: Bearer <token>")]
    MalformedHeader,

    #[error("invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    #[error("no 'kid' in token header")]
    MissingKeyId,

    #[error("key {0} not found in JWKS")]
    UnknownKey(String),

    #[error("failed to fetch JWKS: {0}")]
    JwksFetch(#[from] reqwest::Error),

    #[error("malformed JWKS: {0}")]
    MalformedJwks(String),

    #[error("invalid subject claim: {0}")]
    InvalidSubject(#[from] uuid::Error),
}

/// Verifies bearer tokens with whichever key material is configured.
#[derive(Clone)]
pub enum TokenVerifier {
    Jwks(JwksCache),
    Secret(String),
}

impl TokenVerifier {
    pub fn from_config(config: &AuthConfig) -> Self {
        match config {
            AuthConfig::Jwks {
                project_ref,
                anon_key,
            } => TokenVerifier::Jwks(JwksCache::new(project_ref, anon_key)),
            AuthConfig::Secret(secret) => TokenVerifier::Secret(secret.clone()),
        }
    }

    pub async fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        match self {
            TokenVerifier::Jwks(cache) => cache.validate_token(token).await,
            TokenVerifier::Secret(secret) => jwt::validate_with_secret(token, secret),
        }
    }
}
