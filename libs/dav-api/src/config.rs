use std::path::Path;

use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("read '{path}': {source}")]
    Read { path: String, source: std::io::Error },

    #[error("parse '{path}': {source}")]
    Parse { path: String, source: toml::de::Error },

    #[error("api_seed_urls must contain at least one url")]
    NoSeedUrls,
}

/// Process-wide, read-only settings. Shared as `Arc<Config>` by every
/// component and injected into every record.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Config {
    /// Registrar endpoints. Only the first one is used.
    pub api_seed_urls: Vec<String>,

    /// Default need lifetime, seconds.
    #[serde(default = "default_need_ttl")]
    pub need_ttl: u64,

    #[serde(default = "default_bid_ttl")]
    pub bid_ttl: u64,

    #[serde(default = "default_mission_ttl")]
    pub mission_ttl: u64,

    #[serde(default = "default_message_ttl")]
    pub message_ttl: u64,

    /// Buffer of the channel between a subscription relay and its consumer.
    #[serde(default = "default_stream_buffer")]
    pub stream_buffer: usize,
}

fn default_need_ttl() -> u64 {
    86_400
}
fn default_bid_ttl() -> u64 {
    3_600
}
fn default_mission_ttl() -> u64 {
    86_400
}
fn default_message_ttl() -> u64 {
    3_600
}
fn default_stream_buffer() -> usize {
    256
}

impl Config {
    /// Config with defaults for everything but the registrar address.
    pub fn new(api_seed_url: impl Into<String>) -> Self {
        Self {
            api_seed_urls: vec![api_seed_url.into()],
            need_ttl: default_need_ttl(),
            bid_ttl: default_bid_ttl(),
            mission_ttl: default_mission_ttl(),
            message_ttl: default_message_ttl(),
            stream_buffer: default_stream_buffer(),
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config: Config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.api_seed_url().map(|_| ())
    }

    /// First registrar url, without a trailing slash.
    pub fn api_seed_url(&self) -> Result<&str, ConfigError> {
        self.api_seed_urls
            .first()
            .map(|url| url.trim_end_matches('/'))
            .filter(|url| !url.is_empty())
            .ok_or(ConfigError::NoSeedUrls)
    }
}
