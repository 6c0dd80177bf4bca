use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
    #[error("failed to parse {name} as integer: {source}")]
    ParseInt {
        name: String,
        #[source]
        source: std::num::ParseIntError,
    },
}

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the listing API.
    pub api_base_url: String,
    /// User agent sent with every request. Reddit rejects empty agents.
    pub user_agent: String,
    /// Per-request timeout.
    pub request_timeout: Duration,
    /// Number of items requested per page.
    pub page_limit: u32,
}

const DEFAULT_BASE_URL: &str = "https://oauth.reddit.com";
const DEFAULT_USER_AGENT: &str = concat!("reddit-link-feed/", env!("CARGO_PKG_VERSION"));

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a set variable fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            api_base_url: env_or_default("REDDIT_API_BASE_URL", DEFAULT_BASE_URL),
            user_agent: env_or_default("REDDIT_USER_AGENT", DEFAULT_USER_AGENT),
            request_timeout: Duration::from_secs(parse_env_u64("REQUEST_TIMEOUT_SECS", 30)?),
            page_limit: parse_env_u32("PAGE_LIMIT", 25)?,
        })
    }

    /// Validate that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_base_url.is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "REDDIT_API_BASE_URL".to_string(),
                message: "cannot be empty".to_string(),
            });
        }
        if url::Url::parse(&self.api_base_url).is_err() {
            return Err(ConfigError::InvalidValue {
                name: "REDDIT_API_BASE_URL".to_string(),
                message: format!("not a valid URL: '{}'", self.api_base_url),
            });
        }
        if self.user_agent.is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "REDDIT_USER_AGENT".to_string(),
                message: "cannot be empty".to_string(),
            });
        }
        if self.page_limit == 0 || self.page_limit > 100 {
            return Err(ConfigError::InvalidValue {
                name: "PAGE_LIMIT".to_string(),
                message: "must be between 1 and 100".to_string(),
            });
        }
        Ok(())
    }

    /// Configuration suitable for tests; point `api_base_url` at a mock server.
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            api_base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: "reddit-link-feed-tests/0".to_string(),
            request_timeout: Duration::from_secs(5),
            page_limit: 25,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout: Duration::from_secs(30),
            page_limit: 25,
        }
    }
}

fn env_or_default(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_env_u64(name: &str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_u32(name: &str, default: u32) -> Result<u32, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    #[test]
    #[serial]
    fn test_defaults_when_env_unset() {
        std::env::remove_var("REDDIT_API_BASE_URL");
        std::env::remove_var("PAGE_LIMIT");
        let config = Config::from_env().unwrap();
        assert_eq!(config.api_base_url, DEFAULT_BASE_URL);
        assert_eq!(config.page_limit, 25);
        config.validate().unwrap();
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        std::env::set_var("REDDIT_API_BASE_URL", "http://localhost:9999");
        std::env::set_var("PAGE_LIMIT", "50");
        let config = Config::from_env().unwrap();
        assert_eq!(config.api_base_url, "http://localhost:9999");
        assert_eq!(config.page_limit, 50);
        std::env::remove_var("REDDIT_API_BASE_URL");
        std::env::remove_var("PAGE_LIMIT");
    }

    #[test]
    #[serial]
    fn test_invalid_page_limit_rejected() {
        let mut config = Config::for_testing();
        config.page_limit = 0;
        assert!(config.validate().is_err());
        config.page_limit = 101;
        assert!(config.validate().is_err());
        config.page_limit = 100;
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_invalid_base_url_rejected() {
        let mut config = Config::for_testing();
        config.api_base_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    #[serial]
    fn test_parse_int_error() {
        std::env::set_var("REQUEST_TIMEOUT_SECS", "abc");
        assert!(Config::from_env().is_err());
        std::env::remove_var("REQUEST_TIMEOUT_SECS");
    }
}
