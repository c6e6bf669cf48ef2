//! Configuration module for hubfeed.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::feed::{RepositoryConfig, DEFAULT_PAGE_SIZE};
use crate::{HubFeedError, Result};

/// HTTP server configuration.
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
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Upstream registry configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RegistryConfig {
    /// Base URL of the tag-listing API.
    #[serde(default = "default_registry_url")]
    pub api_url: String,
    /// Base URL of the human-facing tag pages.
    #[serde(default = "default_registry_url")]
    pub web_url: String,
    /// Number of tags requested per repository (only the first page is read).
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Connection timeout in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    /// Total request timeout in seconds.
    #[serde(default = "default_total_timeout")]
    pub total_timeout_secs: u64,
    /// Maximum number of redirects.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
    /// Maximum accepted response body size in bytes.
    #[serde(default = "default_max_response_bytes")]
    pub max_response_bytes: u64,
}

fn default_registry_url() -> String {
    "https://hub.docker.com".to_string()
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_total_timeout() -> u64 {
    30
}

fn default_max_redirects() -> usize {
    5
}

fn default_max_response_bytes() -> u64 {
    5 * 1024 * 1024 // 5MB
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            api_url: default_registry_url(),
            web_url: default_registry_url(),
            page_size: default_page_size(),
            connect_timeout_secs: default_connect_timeout(),
            total_timeout_secs: default_total_timeout(),
            max_redirects: default_max_redirects(),
            max_response_bytes: default_max_response_bytes(),
        }
    }
}

/// Feed-level metadata configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    /// Feed title.
    #[serde(default = "default_feed_title")]
    pub title: String,
    /// Public URL of the feed. Defaults to `http://{host}:{port}/`.
    #[serde(default)]
    pub self_link: Option<String>,
}

fn default_feed_title() -> String {
    "Docker Hub updates".to_string()
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            title: default_feed_title(),
            self_link: None,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file. Empty means console only.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/hubfeed.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Registry configuration.
    #[serde(default)]
    pub registry: RegistryConfig,
    /// Feed configuration.
    #[serde(default)]
    pub feed: FeedConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Watched repositories: identifier to filter pattern.
    #[serde(default)]
    pub repositories: BTreeMap<String, String>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(HubFeedError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load, override and validate the configuration at `path`.
    ///
    /// Any failure here is fatal for the binary; there is no fallback config.
    pub fn load_validated<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Self::load_with_env(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| HubFeedError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `HUBFEED_HOST`: Override the bind address
    /// - `HUBFEED_PORT`: Override the listen port
    pub fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("HUBFEED_HOST") {
            if !host.is_empty() {
                self.server.host = host;
            }
        }

        if let Ok(port) = std::env::var("HUBFEED_PORT") {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!("Ignoring invalid HUBFEED_PORT value: {}", port),
            }
        }
    }

    /// Validate the configuration.
    ///
    /// Returns an error if:
    /// - a repository identifier is empty
    /// - a filter pattern does not compile
    /// - a registry URL is not an absolute http(s) URL
    /// - the page size is zero
    pub fn validate(&self) -> Result<()> {
        for (identifier, pattern) in &self.repositories {
            if identifier.trim().is_empty() {
                return Err(HubFeedError::Config(
                    "repository identifier must not be empty".to_string(),
                ));
            }
            regex::Regex::new(pattern).map_err(|e| {
                HubFeedError::Config(format!("invalid filter pattern for {identifier}: {e}"))
            })?;
        }

        validate_base_url("registry.api_url", &self.registry.api_url)?;
        validate_base_url("registry.web_url", &self.registry.web_url)?;

        if self.registry.page_size == 0 {
            return Err(HubFeedError::Config(
                "registry.page_size must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    /// The configured repositories, ordered by identifier.
    pub fn repositories(&self) -> Vec<RepositoryConfig> {
        self.repositories
            .iter()
            .map(|(identifier, pattern)| RepositoryConfig::new(identifier, pattern))
            .collect()
    }

    /// Public URL of the feed, used for the self link and the feed id.
    pub fn feed_self_link(&self) -> String {
        match &self.feed.self_link {
            Some(link) => link.clone(),
            None => format!("http://{}:{}/", self.server.host, self.server.port),
        }
    }
}

fn validate_base_url(field: &str, value: &str) -> Result<()> {
    let url = url::Url::parse(value)
        .map_err(|e| HubFeedError::Config(format!("{field} is not a valid URL: {e}")))?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(HubFeedError::Config(format!(
            "{field} has unsupported scheme: {scheme}"
        ))),
    }
}
