//! Client configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{PushEnvironment, PushType};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Config file not found at {0}")]
    NotFound(PathBuf),
    #[error("Subscribe key is required")]
    MissingSubscribeKey,
}

/// PubNub client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub publish_key: Option<String>,
    #[serde(default)]
    pub subscribe_key: String,
    #[serde(default)]
    pub auth_key: Option<String>,
    #[serde(default = "default_uuid")]
    pub uuid: String,
    #[serde(default = "default_origin")]
    pub origin: String,
    #[serde(default = "default_tls")]
    pub tls: bool,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub push: PushOptions,
}

/// Push service addressing applied to registration requests.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PushOptions {
    #[serde(default)]
    pub push_type: PushType,
    #[serde(default)]
    pub environment: PushEnvironment,
    #[serde(default)]
    pub topic: Option<String>, // APNs bundle ID, required for apns2
}

fn default_uuid() -> String {
    format!("pn-{}", uuid::Uuid::new_v4())
}

fn default_origin() -> String {
    "ps.pndsn.com".to_string()
}

fn default_tls() -> bool {
    true
}

fn default_request_timeout() -> u64 {
    10
}

impl Config {
    /// Create a configuration for the given keys with all other fields defaulted.
    pub fn new(publish_key: impl Into<String>, subscribe_key: impl Into<String>) -> Self {
        Self {
            publish_key: Some(publish_key.into()),
            subscribe_key: subscribe_key.into(),
            auth_key: None,
            uuid: default_uuid(),
            origin: default_origin(),
            tls: default_tls(),
            request_timeout_secs: default_request_timeout(),
            push: PushOptions::default(),
        }
    }

    /// Configuration using the public demo keyset.
    pub fn demo() -> Self {
        Self::new("demo", "demo")
    }

    /// Load from the default config path, then apply environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path();
        if !config_path.exists() {
            return Err(ConfigError::NotFound(config_path));
        }
        Self::from_path(&config_path)
    }

    /// Load from a TOML file, then apply environment overrides.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&content)?;
        config.apply_env_overrides();
        config.validate()?;
        tracing::debug!(path = %path.display(), origin = %config.origin, "loaded config");
        Ok(config)
    }

    /// Parse TOML without consulting the environment.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("/etc"))
            .join("pubnub")
            .join("config.toml")
    }

    /// Override keys and origin from `PUBNUB_*` environment variables.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup("PUBNUB_PUBLISH_KEY") {
            self.publish_key = Some(key);
        }
        if let Some(key) = lookup("PUBNUB_SUBSCRIBE_KEY") {
            self.subscribe_key = key;
        }
        if let Some(key) = lookup("PUBNUB_AUTH_KEY") {
            self.auth_key = Some(key);
        }
        if let Some(origin) = lookup("PUBNUB_ORIGIN") {
            self.origin = origin;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.subscribe_key.trim().is_empty() {
            return Err(ConfigError::MissingSubscribeKey);
        }
        Ok(())
    }

    /// Base URL requests are sent to, e.g. `https://ps.pndsn.com`.
    pub fn base_url(&self) -> String {
        if self.origin.contains("://") {
            return self.origin.trim_end_matches('/').to_string();
        }
        let scheme = if self.tls { "https" } else { "http" };
        format!("{}://{}", scheme, self.origin.trim_end_matches('/'))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::demo()
    }
}
