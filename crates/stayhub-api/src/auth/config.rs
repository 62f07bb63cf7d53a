// Session configuration loaded from environment variables

use anyhow::{Context, Result};
use std::time::Duration;

/// Session credential configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Secret key for signing session tokens
    pub secret: String,
    /// Production deployments mark the cookie Secure and cross-site-sendable
    pub production: bool,
    /// Session token lifetime
    pub token_lifetime: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            production: false,
            token_lifetime: Duration::from_secs(60 * 60), // 1 hour
        }
    }
}

impl AuthConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let secret = std::env::var("ACCESS_TOKEN_SECRET")
            .context("ACCESS_TOKEN_SECRET environment variable required")?;
        let production = std::env::var("APP_ENV")
            .map(|v| v.eq_ignore_ascii_case("production"))
            .unwrap_or(false);

        Ok(Self {
            secret,
            production,
            ..Default::default()
        })
    }
}
