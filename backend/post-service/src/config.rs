/// Configuration management for the post service
///
/// This module handles loading and managing configuration from environment
/// variables.
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// CORS configuration
    pub cors: CorsConfig,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Cache (Redis) configuration
    pub cache: CacheConfig,
    /// JWT validation configuration
    pub auth: AuthConfig,
    /// Report expiry sweeper configuration
    pub sweeper: SweeperConfig,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (dev, staging, prod)
    pub env: String,
    /// Server host to bind to
    pub host: String,
    /// Server port to bind to
    pub port: u16,
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Comma-separated list of allowed origins
    pub allowed_origins: String,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database URL
    pub url: String,
    /// Max connections in pool
    pub max_connections: u32,
}

/// Cache (Redis) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Redis URL
    pub url: String,
    /// Lifetime of single-object snapshots, seconds
    pub object_ttl_secs: u64,
}

/// JWT validation configuration
///
/// Token issuance belongs to the external identity provider; this service
/// only needs a verification key. Either an RSA public key (PEM) or a
/// shared HS256 secret must be configured.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// RS256 public key, PEM text
    pub public_key: Option<String>,
    /// HS256 shared secret (development / tests)
    pub secret: Option<String>,
}

/// Report expiry sweeper configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweeperConfig {
    /// Seconds between sweep ticks
    pub interval_secs: u64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        Ok(Config {
            app: AppConfig {
                env: app_env.clone(),
                host: std::env::var("POST_SERVICE_HOST")
                    .unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: std::env::var("POST_SERVICE_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(8080),
            },
            cors: {
                let allowed_origins = match std::env::var("CORS_ALLOWED_ORIGINS") {
                    Ok(value) => value,
                    Err(_) if app_env.eq_ignore_ascii_case("production") => {
                        return Err("CORS_ALLOWED_ORIGINS must be set in production".to_string())
                    }
                    Err(_) => "http://localhost:3000".to_string(),
                };

                if app_env.eq_ignore_ascii_case("production") && allowed_origins.trim() == "*" {
                    return Err("CORS_ALLOWED_ORIGINS cannot be '*' in production".to_string());
                }

                CorsConfig { allowed_origins }
            },
            database: DatabaseConfig {
                url: std::env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "postgresql://localhost/quill".to_string()),
                max_connections: std::env::var("DATABASE_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|c| c.parse().ok())
                    .unwrap_or(10),
            },
            cache: CacheConfig {
                url: std::env::var("REDIS_URL")
                    .unwrap_or_else(|_| "redis://localhost:6379".to_string()),
                object_ttl_secs: std::env::var("CACHE_OBJECT_TTL_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(3600),
            },
            auth: {
                let public_key = std::env::var("JWT_PUBLIC_KEY").ok();
                let secret = std::env::var("JWT_SECRET").ok();

                if public_key.is_none() && secret.is_none() {
                    return Err(
                        "either JWT_PUBLIC_KEY or JWT_SECRET must be set for token validation"
                            .to_string(),
                    );
                }

                AuthConfig { public_key, secret }
            },
            sweeper: SweeperConfig {
                interval_secs: std::env::var("SWEEPER_INTERVAL_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(24 * 60 * 60),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for key in [
            "APP_ENV",
            "POST_SERVICE_HOST",
            "POST_SERVICE_PORT",
            "CORS_ALLOWED_ORIGINS",
            "DATABASE_URL",
            "DATABASE_MAX_CONNECTIONS",
            "REDIS_URL",
            "CACHE_OBJECT_TTL_SECS",
            "JWT_PUBLIC_KEY",
            "JWT_SECRET",
            "SWEEPER_INTERVAL_SECS",
        ] {
            std::env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();
        std::env::set_var("JWT_SECRET", "test-secret");

        let config = Config::from_env().expect("config should load");
        assert_eq!(config.app.port, 8080);
        assert_eq!(config.cache.object_ttl_secs, 3600);
        assert_eq!(config.sweeper.interval_secs, 86400);
        clear_env();
    }

    #[test]
    #[serial]
    fn test_requires_validation_key() {
        clear_env();
        assert!(Config::from_env().is_err());
    }

    #[test]
    #[serial]
    fn test_production_requires_cors_origins() {
        clear_env();
        std::env::set_var("JWT_SECRET", "test-secret");
        std::env::set_var("APP_ENV", "production");

        assert!(Config::from_env().is_err());

        std::env::set_var("CORS_ALLOWED_ORIGINS", "*");
        assert!(Config::from_env().is_err());

        std::env::set_var("CORS_ALLOWED_ORIGINS", "https://quill.example");
        assert!(Config::from_env().is_ok());
        clear_env();
    }

    #[test]
    #[serial]
    fn test_sweeper_interval_override() {
        clear_env();
        std::env::set_var("JWT_SECRET", "test-secret");
        std::env::set_var("SWEEPER_INTERVAL_SECS", "300");

        let config = Config::from_env().expect("config should load");
        assert_eq!(config.sweeper.interval_secs, 300);
        clear_env();
    }
}
