use std::env;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
}

/// Process configuration, read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    /// HMAC secret for session tokens. Optional so the server can still serve
    /// public endpoints; issuing a session without it fails that request.
    pub jwt_secret: Option<String>,
    /// Base URL used when building links sent to users (password resets).
    pub public_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| {
            tracing::debug!("BIND_ADDR not set, using default 0.0.0.0:3000");
            "0.0.0.0:3000".to_string()
        });

        let jwt_secret = env::var("JWT_SECRET").ok().filter(|s| !s.is_empty());
        if jwt_secret.is_none() {
            tracing::warn!("JWT_SECRET not set, login and signup will fail");
        }

        let public_url = env::var("PUBLIC_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|_| "http://localhost:3000".to_string());

        Ok(Self {
            database_url,
            bind_addr,
            jwt_secret,
            public_url,
        })
    }
}
