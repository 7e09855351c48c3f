use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// How bearer tokens are verified.
#[derive(Debug, Clone)]
pub enum AuthConfig {
    /// Asymmetric keys fetched from the Supabase project's JWKS endpoint.
    Jwks { project_ref: String, anon_key: String },
    /// Legacy HS256 shared secret.
    Secret(String),
}

/// Process configuration, read once at startup from the environment
/// (after `.env` has been loaded).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    /// How long a request waits for a pooled connection before failing as a
    /// transient storage error.
    pub db_acquire_timeout: Duration,
    pub port: u16,
    pub auth: AuthConfig,
    /// Empty means any origin is allowed.
    pub cors_allowed_origins: Vec<String>,
    pub run_migrations: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = required("DATABASE_URL")?;

        let auth = match std::env::var("SUPABASE_JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => AuthConfig::Secret(secret),
            _ => {
                let supabase_url = required("SUPABASE_URL")?;
                let project_ref = parse_project_ref(&supabase_url)?;
                AuthConfig::Jwks {
                    project_ref,
                    anon_key: required("SUPABASE_ANON_KEY")?,
                }
            }
        };

        Ok(Self {
            database_url,
            db_max_connections: parse_or("DB_MAX_CONNECTIONS", 10)?,
            db_acquire_timeout: Duration::from_secs(parse_or("DB_ACQUIRE_TIMEOUT_SECS", 5)?),
            port: parse_or("PORT", 8080)?,
            auth,
            cors_allowed_origins: std::env::var("CORS_ALLOWED_ORIGINS")
                .map(|v| parse_origins(&v))
                .unwrap_or_default(),
            run_migrations: parse_or("RUN_MIGRATIONS", false)?,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::Missing(name))
}

fn parse_or<T>(name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(v) => v.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

/// `https://PROJECT.supabase.co` -> `PROJECT`
pub fn parse_project_ref(supabase_url: &str) -> Result<String, ConfigError> {
    supabase_url
        .trim_end_matches('/')
        .strip_prefix("https://")
        .and_then(|s| s.strip_suffix(".supabase.co"))
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ConfigError::Invalid {
            name: "SUPABASE_URL",
            reason: "expected https://PROJECT.supabase.co".to_string(),
        })
}

pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
