use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header};
use moka::future::Cache;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use super::AuthError;
use super::jwt::Claims;

const JWKS_URL_TEMPLATE: &str = "https://{}.supabase.co/auth/v1/.well-known/jwks.json";

#[derive(Debug, Deserialize)]
struct JwkSet {
    keys: Vec<Jwk>,
}

#[derive(Debug, Clone, Deserialize)]
struct Jwk {
    kid: Option<String>,
    alg: Option<String>,
    x: Option<String>,
    y: Option<String>,
}

/// EC public key components for one `kid`.
#[derive(Clone)]
struct EcKey {
    x: String,
    y: String,
    algorithm: Algorithm,
}

impl TryFrom<Jwk> for EcKey {
    type Error = AuthError;

    fn try_from(jwk: Jwk) -> Result<Self, Self::Error> {
        let algorithm = match jwk.alg.as_deref() {
            Some("ES384") => Algorithm::ES384,
            _ => Algorithm::ES256,
        };

        Ok(Self {
            x: jwk
                .x
                .ok_or_else(|| AuthError::MalformedJwks("missing 'x'".to_string()))?,
            y: jwk
                .y
                .ok_or_else(|| AuthError::MalformedJwks("missing 'y'".to_string()))?,
            algorithm,
        })
    }
}

/// Signing keys of the Supabase project, cached for an hour per `kid`.
#[derive(Clone)]
pub struct JwksCache {
    cache: Arc<Cache<String, EcKey>>,
    jwks_url: String,
    client: reqwest::Client,
    anon_key: String,
}

impl JwksCache {
    pub fn new(project_ref: &str, anon_key: &str) -> Self {
        let cache = Arc::new(
            Cache::builder()
                .time_to_live(Duration::from_secs(3600))
                .max_capacity(10)
                .build(),
        );

        Self {
            cache,
            jwks_url: JWKS_URL_TEMPLATE.replace("{}", project_ref),
            client: reqwest::Client::new(),
            anon_key: anon_key.to_string(),
        }
    }

    async fn fetch_jwks(&self) -> Result<JwkSet, AuthError> {
        debug!("Fetching JWKS from {}", self.jwks_url);

        let jwks = self
            .client
            .get(&self.jwks_url)
            .header("apikey", &self.anon_key)
            .send()
            .await?
            .error_for_status()?
            .json::<JwkSet>()
            .await?;

        Ok(jwks)
    }

    async fn key_for(&self, kid: &str) -> Result<EcKey, AuthError> {
        if let Some(cached) = self.cache.get(kid).await {
            return Ok(cached);
        }

        let jwk = self
            .fetch_jwks()
            .await?
            .keys
            .into_iter()
            .find(|k| k.kid.as_deref() == Some(kid))
            .ok_or_else(|| AuthError::UnknownKey(kid.to_string()))?;

        let key = EcKey::try_from(jwk)?;
        self.cache.insert(kid.to_string(), key.clone()).await;
        Ok(key)
    }

    pub async fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        let kid = decode_header(token)?.kid.ok_or(AuthError::MissingKeyId)?;
        let key = self.key_for(&kid).await?;

        let decoding_key = DecodingKey::from_ec_components(&key.x, &key.y)?;
        let mut validation = Validation::new(key.algorithm);
        validation.validate_aud = false;

        Ok(decode::<Claims>(token, &decoding_key, &validation)?.claims)
    }
}
