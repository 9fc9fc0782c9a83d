/// Configuration management for Board Service
///
/// Everything is read from environment variables. Missing values fall back
/// to development defaults; values that are present but unparsable are
/// reported as errors.
use actix_middleware::{FailureMode, KeyStrategy, RateLimitConfig};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// CORS configuration
    pub cors: CorsConfig,
    /// Post storage configuration
    pub storage: StorageConfig,
    /// Write-path rate limiting
    pub rate_limit: RateLimitSettings,
    /// Profanity masking
    pub moderation: ModerationConfig,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
    /// Server host to bind to
    pub host: String,
    /// Server port to bind to
    pub port: u16,
    /// Actix worker threads
    pub workers: usize,
}

impl AppConfig {
    pub fn is_production(&self) -> bool {
        self.env.eq_ignore_ascii_case("production")
    }
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Comma-separated list of allowed origins, or `*`
    pub allowed_origins: String,
}

impl CorsConfig {
    pub fn origins(&self) -> Vec<&str> {
        self.allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .collect()
    }

    pub fn allows_any(&self) -> bool {
        self.allowed_origins.trim() == "*"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(format!("unknown storage backend '{}'", other)),
        }
    }
}

/// Post storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Database URL
    pub database_url: String,
    /// Max connections in pool
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimiterBackend {
    Memory,
    Redis,
}

impl FromStr for LimiterBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(LimiterBackend::Memory),
            "redis" => Ok(LimiterBackend::Redis),
            other => Err(format!("unknown rate limit backend '{}'", other)),
        }
    }
}

/// Rate limiting configuration
#[derive(Debug, Clone)]
pub struct RateLimitSettings {
    pub backend: LimiterBackend,
    /// Redis URL, used when `backend` is `Redis`
    pub redis_url: String,
    pub limits: RateLimitConfig,
}

/// Profanity masking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModerationConfig {
    /// Extra word list merged into the built-in one
    pub words_path: Option<String>,
    pub placeholder: char,
}

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            words_path: None,
            placeholder: '*',
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
        let app = AppConfig {
            env: app_env.clone(),
            host: std::env::var("BOARD_SERVICE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_env_or("BOARD_SERVICE_PORT", 5000)?,
            workers: parse_env_or("BOARD_SERVICE_WORKERS", 4)?,
        };

        let cors = {
            let allowed_origins = match std::env::var("CORS_ALLOWED_ORIGINS") {
                Ok(value) => value,
                Err(_) if app.is_production() => {
                    return Err("CORS_ALLOWED_ORIGINS must be set in production".to_string())
                }
                Err(_) => "*".to_string(),
            };

            if app.is_production() && allowed_origins.trim() == "*" {
                return Err("CORS_ALLOWED_ORIGINS cannot be '*' in production".to_string());
            }

            CorsConfig { allowed_origins }
        };

        let storage = StorageConfig {
            backend: parse_env_or("STORAGE_BACKEND", StorageBackend::Postgres)?,
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgresql://localhost/board".to_string()),
            max_connections: parse_env_or("DATABASE_MAX_CONNECTIONS", 10)?,
            acquire_timeout_secs: parse_env_or("DATABASE_ACQUIRE_TIMEOUT_SECS", 5)?,
        };

        let defaults = RateLimitConfig::default();
        let limits = RateLimitConfig {
            max_requests: parse_env_or("RATE_LIMIT_MAX_REQUESTS", defaults.max_requests)?,
            window_seconds: parse_env_or("RATE_LIMIT_WINDOW_SECONDS", defaults.window_seconds)?,
            key_strategy: parse_env_or::<KeyStrategy>("RATE_LIMIT_KEY", defaults.key_strategy)?,
            trust_forwarded_for: parse_env_or(
                "RATE_LIMIT_TRUST_FORWARDED_FOR",
                defaults.trust_forwarded_for,
            )?,
            failure_mode: parse_env_or::<FailureMode>(
                "RATE_LIMIT_FAILURE_MODE",
                defaults.failure_mode,
            )?,
            backend_timeout_ms: parse_env_or(
                "RATE_LIMIT_BACKEND_TIMEOUT_MS",
                defaults.backend_timeout_ms,
            )?,
        };
        if limits.max_requests == 0 {
            return Err("RATE_LIMIT_MAX_REQUESTS must be at least 1".to_string());
        }
        if limits.window_seconds == 0 {
            return Err("RATE_LIMIT_WINDOW_SECONDS must be at least 1".to_string());
        }

        let rate_limit = RateLimitSettings {
            backend: parse_env_or("RATE_LIMIT_BACKEND", LimiterBackend::Memory)?,
            redis_url: std::env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://localhost:6379".to_string()),
            limits,
        };

        let moderation = ModerationConfig {
            words_path: std::env::var("PROFANITY_WORDS_PATH")
                .ok()
                .filter(|p| !p.trim().is_empty()),
            placeholder: parse_env_or("PROFANITY_PLACEHOLDER", '*')?,
        };

        Ok(Config {
            app,
            cors,
            storage,
            rate_limit,
            moderation,
        })
    }
}

fn parse_env_or<T>(key: &str, default: T) -> Result<T, String>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(val) => val
            .trim()
            .parse()
            .map_err(|e| format!("Failed to parse {}='{}': {}", key, val, e)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const KEYS: &[&str] = &[
        "APP_ENV",
        "BOARD_SERVICE_PORT",
        "CORS_ALLOWED_ORIGINS",
        "STORAGE_BACKEND",
        "RATE_LIMIT_MAX_REQUESTS",
        "RATE_LIMIT_WINDOW_SECONDS",
        "RATE_LIMIT_KEY",
        "RATE_LIMIT_BACKEND",
        "PROFANITY_PLACEHOLDER",
    ];

    fn clear_env() {
        for key in KEYS {
            std::env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();
        let config = Config::from_env().unwrap();
        assert_eq!(config.app.port, 5000);
        assert_eq!(config.storage.backend, StorageBackend::Postgres);
        assert_eq!(config.rate_limit.backend, LimiterBackend::Memory);
        assert_eq!(config.rate_limit.limits.max_requests, 1);
        assert_eq!(config.rate_limit.limits.window_seconds, 10);
        assert_eq!(config.rate_limit.limits.key_strategy, KeyStrategy::PerIp);
        assert_eq!(config.moderation.placeholder, '*');
        assert!(config.cors.allows_any());
    }

    #[test]
    #[serial]
    fn test_overrides() {
        clear_env();
        std::env::set_var("STORAGE_BACKEND", "memory");
        std::env::set_var("RATE_LIMIT_MAX_REQUESTS", "3");
        std::env::set_var("RATE_LIMIT_KEY", "global");
        std::env::set_var("PROFANITY_PLACEHOLDER", "#");

        let config = Config::from_env().unwrap();
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.rate_limit.limits.max_requests, 3);
        assert_eq!(config.rate_limit.limits.key_strategy, KeyStrategy::Global);
        assert_eq!(config.moderation.placeholder, '#');
        clear_env();
    }

    #[test]
    #[serial]
    fn test_invalid_values_are_errors() {
        clear_env();
        std::env::set_var("BOARD_SERVICE_PORT", "not-a-port");
        assert!(Config::from_env().is_err());
        clear_env();

        std::env::set_var("RATE_LIMIT_WINDOW_SECONDS", "0");
        assert!(Config::from_env().is_err());
        clear_env();
    }

    #[test]
    #[serial]
    fn test_production_rejects_wildcard_cors() {
        clear_env();
        std::env::set_var("APP_ENV", "production");
        assert!(Config::from_env().is_err());

        std::env::set_var("CORS_ALLOWED_ORIGINS", "*");
        assert!(Config::from_env().is_err());

        std::env::set_var("CORS_ALLOWED_ORIGINS", "https://board.example.com");
        assert!(Config::from_env().is_ok());
        clear_env();
    }

    #[test]
    fn test_cors_origins_split() {
        let cors = CorsConfig {
            allowed_origins: "https://a.test, https://b.test,".to_string(),
        };
        assert_eq!(cors.origins(), ["https://a.test", "https://b.test"]);
        assert!(!cors.allows_any());
    }
}
