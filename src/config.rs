//! Configuration module for newsgate.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::{GatewayError, Result};

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/newsgate.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Feed cache configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// How long a fetched feed stays fresh, in seconds.
    #[serde(default = "default_cache_ttl")]
    pub ttl_secs: u64,
    /// Maximum number of items kept per feed.
    #[serde(default = "default_max_items")]
    pub max_items_per_feed: usize,
}

fn default_cache_ttl() -> u64 {
    300 // 5 minutes
}

fn default_max_items() -> usize {
    20
}

impl CacheConfig {
    /// Cache time-to-live as a duration.
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_cache_ttl(),
            max_items_per_feed: default_max_items(),
        }
    }
}

/// Per-client rate limit configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    /// Length of the fixed window in seconds.
    #[serde(default = "default_window")]
    pub window_secs: u64,
    /// Requests allowed per client in one window.
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,
    /// How often expired windows are swept, in seconds (0 disables sweeping).
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
}

fn default_window() -> u64 {
    60
}

fn default_max_requests() -> u32 {
    10
}

fn default_sweep_interval() -> u64 {
    300
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_secs: default_window(),
            max_requests: default_max_requests(),
            sweep_interval_secs: default_sweep_interval(),
        }
    }
}

/// CORS configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    /// Allowed origins. `"*"` allows any origin.
    #[serde(default = "default_origins")]
    pub origins: Vec<String>,
}

fn default_origins() -> Vec<String> {
    vec!["*".to_string()]
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            origins: default_origins(),
        }
    }
}

/// Upstream feed fetch configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    /// Connection timeout in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    /// Read timeout in seconds.
    #[serde(default = "default_read_timeout")]
    pub read_timeout_secs: u64,
    /// Total request timeout in seconds.
    #[serde(default = "default_total_timeout")]
    pub total_timeout_secs: u64,
    /// Maximum number of redirects.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
    /// Maximum feed size in bytes.
    #[serde(default = "default_max_feed_size")]
    pub max_feed_size_bytes: u64,
    /// User agent sent upstream.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_read_timeout() -> u64 {
    20
}

fn default_total_timeout() -> u64 {
    30
}

fn default_max_redirects() -> usize {
    5
}

fn default_max_feed_size() -> u64 {
    5 * 1024 * 1024 // 5MB
}

fn default_user_agent() -> String {
    format!("newsgate/{} (RSS Gateway)", env!("CARGO_PKG_VERSION"))
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: default_connect_timeout(),
            read_timeout_secs: default_read_timeout(),
            total_timeout_secs: default_total_timeout(),
            max_redirects: default_max_redirects(),
            max_feed_size_bytes: default_max_feed_size(),
            user_agent: default_user_agent(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Feed cache configuration.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Rate limit configuration.
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    /// CORS configuration.
    #[serde(default)]
    pub cors: CorsConfig,
    /// Upstream fetch configuration.
    #[serde(default)]
    pub fetch: FetchConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(GatewayError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| GatewayError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `NEWSGATE_HOST`: bind address
    /// - `NEWSGATE_PORT`: listen port (ignored when not a valid port)
    /// - `NEWSGATE_LOG_LEVEL`: log level
    pub fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("NEWSGATE_HOST") {
            if !host.is_empty() {
                self.server.host = host;
            }
        }

        if let Ok(port) = std::env::var("NEWSGATE_PORT") {
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }

        if let Ok(level) = std::env::var("NEWSGATE_LOG_LEVEL") {
            if !level.is_empty() {
                self.logging.level = level;
            }
        }
    }

    /// Validate the configuration.
    ///
    /// Zero-valued TTL, window, request quota or item limit would make the
    /// gateway either refetch on every request or reject everything.
    pub fn validate(&self) -> Result<()> {
        if self.cache.ttl_secs == 0 {
            return Err(GatewayError::Config("cache.ttl_secs must be positive".to_string()));
        }
        if self.cache.max_items_per_feed == 0 {
            return Err(GatewayError::Config(
                "cache.max_items_per_feed must be positive".to_string(),
            ));
        }
        if self.rate_limit.window_secs == 0 {
            return Err(GatewayError::Config(
                "rate_limit.window_secs must be positive".to_string(),
            ));
        }
        if self.rate_limit.max_requests == 0 {
            return Err(GatewayError::Config(
                "rate_limit.max_requests must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);

        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.file, "logs/newsgate.log");

        assert_eq!(config.cache.ttl_secs, 300);
        assert_eq!(config.cache.ttl(), Duration::from_secs(300));
        assert_eq!(config.cache.max_items_per_feed, 20);

        assert_eq!(config.rate_limit.window_secs, 60);
        assert_eq!(config.rate_limit.max_requests, 10);
        assert_eq!(config.rate_limit.sweep_interval_secs, 300);

        assert_eq!(config.cors.origins, vec!["*".to_string()]);

        assert_eq!(config.fetch.connect_timeout_secs, 10);
        assert_eq!(config.fetch.read_timeout_secs, 20);
        assert_eq!(config.fetch.total_timeout_secs, 30);
        assert_eq!(config.fetch.max_redirects, 5);
        assert_eq!(config.fetch.max_feed_size_bytes, 5 * 1024 * 1024);
        assert!(config.fetch.user_agent.starts_with("newsgate/"));
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[server]
host = "127.0.0.1"
port = 8080

[logging]
level = "debug"
file = "custom/logs/app.log"

[cache]
ttl_secs = 120
max_items_per_feed = 5

[rate_limit]
window_secs = 30
max_requests = 3
sweep_interval_secs = 0

[cors]
origins = ["https://news.example.com", "http://localhost:5173"]

[fetch]
connect_timeout_secs = 5
read_timeout_secs = 15
total_timeout_secs = 20
max_redirects = 2
max_feed_size_bytes = 1048576
user_agent = "TestAgent/1.0"
"#;

        let config = Config::parse(toml).unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);

        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.file, "custom/logs/app.log");

        assert_eq!(config.cache.ttl_secs, 120);
        assert_eq!(config.cache.max_items_per_feed, 5);

        assert_eq!(config.rate_limit.window_secs, 30);
        assert_eq!(config.rate_limit.max_requests, 3);
        assert_eq!(config.rate_limit.sweep_interval_secs, 0);

        assert_eq!(config.cors.origins.len(), 2);
        assert_eq!(config.cors.origins[0], "https://news.example.com");

        assert_eq!(config.fetch.connect_timeout_secs, 5);
        assert_eq!(config.fetch.read_timeout_secs, 15);
        assert_eq!(config.fetch.total_timeout_secs, 20);
        assert_eq!(config.fetch.max_redirects, 2);
        assert_eq!(config.fetch.max_feed_size_bytes, 1048576);
        assert_eq!(config.fetch.user_agent, "TestAgent/1.0");
    }

    #[test]
    fn test_parse_partial_config() {
        let toml = r#"
[server]
port = 4000

[rate_limit]
max_requests = 50
"#;

        let config = Config::parse(toml).unwrap();

        assert_eq!(config.server.port, 4000);
        assert_eq!(config.rate_limit.max_requests, 50);

        // Defaults
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.rate_limit.window_secs, 60);
        assert_eq!(config.cache.ttl_secs, 300);
    }

    #[test]
    fn test_parse_empty_config() {
        let config = Config::parse("").unwrap();

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.cache.max_items_per_feed, 20);
    }

    #[test]
    fn test_parse_invalid_config() {
        let result = Config::parse("this is not valid toml [[[");

        assert!(result.is_err());
        if let Err(GatewayError::Config(msg)) = result {
            assert!(msg.contains("config parse error"));
        } else {
            panic!("Expected Config error");
        }
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = Config::load("nonexistent.toml");

        assert!(matches!(result, Err(GatewayError::Io(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[cache]\nttl_secs = 60").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.cache.ttl_secs, 60);
    }

    #[test]
    fn test_apply_env_overrides() {
        let original = std::env::var("NEWSGATE_PORT").ok();

        std::env::set_var("NEWSGATE_PORT", "9090");
        let mut config = Config::default();
        config.apply_env_overrides();
        assert_eq!(config.server.port, 9090);

        std::env::set_var("NEWSGATE_PORT", "not-a-port");
        let mut config = Config::default();
        config.apply_env_overrides();
        assert_eq!(config.server.port, 3000);

        if let Some(val) = original {
            std::env::set_var("NEWSGATE_PORT", val);
        } else {
            std::env::remove_var("NEWSGATE_PORT");
        }
    }

    #[test]
    fn test_validate_defaults() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_values() {
        let mut config = Config::default();
        config.cache.ttl_secs = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.rate_limit.max_requests = 0;
        let result = config.validate();
        if let Err(GatewayError::Config(msg)) = result {
            assert!(msg.contains("max_requests"));
        } else {
            panic!("Expected Config error");
        }

        let mut config = Config::default();
        config.rate_limit.window_secs = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.cache.max_items_per_feed = 0;
        assert!(config.validate().is_err());
    }
}
