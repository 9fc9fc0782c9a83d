/// Configuration for the feed client, loaded from environment variables.
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of board-service
    pub api_url: String,
    /// Posts requested per feed page
    pub page_size: i64,
    pub request_timeout: Duration,
    /// How long the post form stays hidden after a successful submit
    pub form_restore_delay: Duration,
    /// Upper bound on pages walked by a search
    pub search_max_pages: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:5000".to_string(),
            page_size: 5,
            request_timeout: Duration::from_millis(10_000),
            form_restore_delay: Duration::from_secs(10),
            search_max_pages: 20,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, String> {
        let defaults = Self::default();

        let api_url = std::env::var("FEED_API_URL")
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .unwrap_or(defaults.api_url);
        if !api_url.starts_with("http://") && !api_url.starts_with("https://") {
            return Err(format!("FEED_API_URL must be an http(s) URL, got '{}'", api_url));
        }

        let page_size: i64 = parse_env_or("FEED_PAGE_SIZE", defaults.page_size)?;
        if page_size < 1 {
            return Err("FEED_PAGE_SIZE must be at least 1".to_string());
        }

        Ok(Self {
            api_url,
            page_size,
            request_timeout: Duration::from_millis(parse_env_or(
                "FEED_REQUEST_TIMEOUT_MS",
                defaults.request_timeout.as_millis() as u64,
            )?),
            form_restore_delay: Duration::from_secs(parse_env_or(
                "FEED_FORM_RESTORE_DELAY_SECS",
                defaults.form_restore_delay.as_secs(),
            )?),
            search_max_pages: parse_env_or("FEED_SEARCH_MAX_PAGES", defaults.search_max_pages)?
                .max(1),
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

    fn clear_env() {
        for key in [
            "FEED_API_URL",
            "FEED_PAGE_SIZE",
            "FEED_REQUEST_TIMEOUT_MS",
            "FEED_FORM_RESTORE_DELAY_SECS",
            "FEED_SEARCH_MAX_PAGES",
        ] {
            std::env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();
        let config = ClientConfig::from_env().unwrap();
        assert_eq!(config.api_url, "http://localhost:5000");
        assert_eq!(config.page_size, 5);
        assert_eq!(config.form_restore_delay, Duration::from_secs(10));
    }

    #[test]
    #[serial]
    fn test_trailing_slash_is_stripped() {
        clear_env();
        std::env::set_var("FEED_API_URL", "https://board.example.com/");
        let config = ClientConfig::from_env().unwrap();
        assert_eq!(config.api_url, "https://board.example.com");
        clear_env();
    }

    #[test]
    #[serial]
    fn test_rejects_bad_values() {
        clear_env();
        std::env::set_var("FEED_PAGE_SIZE", "0");
        assert!(ClientConfig::from_env().is_err());
        clear_env();

        std::env::set_var("FEED_API_URL", "localhost:5000");
        assert!(ClientConfig::from_env().is_err());
        clear_env();
    }
}
