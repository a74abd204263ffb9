/// Configuration management for social-api
///
/// Loads configuration from environment variables. A `.env` file is honoured when
/// present (see `main`).
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Token signing configuration
    pub auth: AuthConfig,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
    /// Server host to bind to
    pub host: String,
    /// HTTP port
    pub http_port: u16,
    /// Store backend: `postgres` or `memory`
    pub store_backend: StoreBackend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Postgres,
    Memory,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database URL, required for the postgres backend
    pub url: Option<String>,
    /// Max connections in pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Min connections in pool
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Token signing configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret used to sign and verify access tokens
    pub access_token_secret: String,
    /// Access token lifetime in seconds
    #[serde(default = "default_access_token_ttl")]
    pub access_token_ttl_secs: i64,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("access_token_secret", &"<redacted>")
            .field("access_token_ttl_secs", &self.access_token_ttl_secs)
            .finish()
    }
}

// Default values
fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    5
}

fn default_access_token_ttl() -> i64 {
    3600
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let store_backend = match std::env::var("STORE_BACKEND")
            .unwrap_or_else(|_| "postgres".to_string())
            .to_lowercase()
            .as_str()
        {
            "postgres" => StoreBackend::Postgres,
            "memory" => StoreBackend::Memory,
            other => anyhow::bail!("unknown STORE_BACKEND: {}", other),
        };

        let app = AppConfig {
            env: std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            http_port: std::env::var("PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(3000),
            store_backend,
        };

        let database = DatabaseConfig {
            url: std::env::var("DATABASE_URL").ok(),
            max_connections: std::env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_max_connections),
            min_connections: std::env::var("DB_MIN_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_min_connections),
        };

        if store_backend == StoreBackend::Postgres && database.url.is_none() {
            anyhow::bail!("DATABASE_URL environment variable not set");
        }

        let auth = AuthConfig {
            access_token_secret: std::env::var("ACCESS_TOKEN_SECRET_KEY")
                .context("ACCESS_TOKEN_SECRET_KEY environment variable not set")?,
            access_token_ttl_secs: std::env::var("ACCESS_TOKEN_TTL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_access_token_ttl),
        };

        if auth.access_token_secret.is_empty() {
            anyhow::bail!("ACCESS_TOKEN_SECRET_KEY must not be empty");
        }

        Ok(Config {
            app,
            database,
            auth,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Single test so the environment is not mutated concurrently.
    #[test]
    fn test_from_env() {
        std::env::remove_var("STORE_BACKEND");
        std::env::remove_var("PORT");
        std::env::set_var("DATABASE_URL", "postgres://test");
        std::env::set_var("ACCESS_TOKEN_SECRET_KEY", "test-secret");

        let config = Config::from_env().unwrap();

        assert_eq!(config.app.env, "development");
        assert_eq!(config.app.host, "0.0.0.0");
        assert_eq!(config.app.http_port, 3000);
        assert_eq!(config.app.store_backend, StoreBackend::Postgres);
        assert_eq!(config.database.max_connections, 20);
        assert_eq!(config.database.min_connections, 5);
        assert_eq!(config.auth.access_token_ttl_secs, 3600);
        assert!(!format!("{:?}", config.auth).contains("test-secret"));

        std::env::remove_var("ACCESS_TOKEN_SECRET_KEY");
        assert!(Config::from_env().is_err());

        std::env::set_var("ACCESS_TOKEN_SECRET_KEY", "test-secret");
        std::env::set_var("STORE_BACKEND", "memory");
        std::env::remove_var("DATABASE_URL");
        let config = Config::from_env().unwrap();
        assert_eq!(config.app.store_backend, StoreBackend::Memory);
        assert!(config.database.url.is_none());
        std::env::remove_var("STORE_BACKEND");
    }
}
