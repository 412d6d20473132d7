//! Validator configuration
//!
//! The configuration is read once at startup and handed to the validator as
//! an explicit value. Nothing here touches the network.

use std::fmt;
use std::path::Path;
use thiserror::Error;

/// Environment variable selecting the sandbox (testnet) network
pub const ENV_USE_TESTNET: &str = "USE_TESTNET";
/// Environment variable holding the API key
pub const ENV_API_KEY: &str = "BINANCE_API_KEY";
/// Environment variable holding the API secret
pub const ENV_API_SECRET: &str = "BINANCE_API_SECRET";

/// Configuration loading errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value:?} (expected true/false)")]
    InvalidFlag { name: &'static str, value: String },

    #[error("Could not load env file {path}: {reason}")]
    EnvFile { path: String, reason: String },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Read-only view of the settings a validation run consumes
pub trait ConfigProvider {
    /// Whether to talk to the sandbox network instead of production
    fn use_sandbox(&self) -> bool;

    /// API key, `None` when unset or blank
    fn api_key(&self) -> Option<&str>;

    /// API secret, `None` when unset or blank
    fn api_secret(&self) -> Option<&str>;

    /// Credentials, present only when both key and secret are non-empty
    fn credentials(&self) -> Option<Credentials> {
        match (self.api_key(), self.api_secret()) {
            (Some(key), Some(secret)) => Some(Credentials::new(key, secret)),
            _ => None,
        }
    }

    /// Names of the credential variables that are unset or blank
    fn missing_credentials(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.api_key().is_none() {
            missing.push(ENV_API_KEY);
        }
        if self.api_secret().is_none() {
            missing.push(ENV_API_SECRET);
        }
        missing
    }

    /// API key shortened for logs: first 8 characters followed by `...`
    fn masked_api_key(&self) -> Option<String> {
        self.api_key().map(mask)
    }
}

/// Sandbox flag plus credentials as read from the environment
#[derive(Clone, PartialEq, Eq)]
pub struct Configuration {
    pub use_sandbox: bool,
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            use_sandbox: true,
            api_key: None,
            api_secret: None,
        }
    }
}

impl Configuration {
    pub fn new(use_sandbox: bool, api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            use_sandbox,
            api_key: Some(api_key.into()),
            api_secret: Some(api_secret.into()),
        }
    }

    pub fn sandbox(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self::new(true, api_key, api_secret)
    }

    pub fn production(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self::new(false, api_key, api_secret)
    }

    /// Read the configuration from the process environment.
    ///
    /// Loads `.env` from the working directory first when one exists.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load `path` into the environment, then read the configuration.
    ///
    /// Unlike [`Configuration::from_env`], a missing file is an error.
    pub fn from_env_file(path: &Path) -> Result<Self> {
        dotenv::from_path(path).map_err(|e| ConfigError::EnvFile {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a configuration from any variable lookup.
    ///
    /// An unset sandbox flag defaults to `true` so that a bare setup never
    /// lands on production by accident.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let use_sandbox = match lookup(ENV_USE_TESTNET) {
            Some(raw) => parse_flag(ENV_USE_TESTNET, &raw)?,
            None => true,
        };

        Ok(Self {
            use_sandbox,
            api_key: lookup(ENV_API_KEY).and_then(non_blank),
            api_secret: lookup(ENV_API_SECRET).and_then(non_blank),
        })
    }
}

impl ConfigProvider for Configuration {
    fn use_sandbox(&self) -> bool {
        self.use_sandbox
    }

    fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.trim().is_empty())
    }

    fn api_secret(&self) -> Option<&str> {
        self.api_secret.as_deref().filter(|s| !s.trim().is_empty())
    }
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configuration")
            .field("use_sandbox", &self.use_sandbox)
            .field("api_key", &self.masked_api_key())
            .field("api_secret", &self.api_secret().map(|_| "<redacted>"))
            .finish()
    }
}

/// API key and secret, both guaranteed non-empty
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    api_key: String,
    api_secret: String,
}

impl Credentials {
    fn new(api_key: &str, api_secret: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            api_secret: api_secret.to_string(),
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn api_secret(&self) -> &str {
        &self.api_secret
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &mask(&self.api_key))
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

fn parse_flag(name: &'static str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            name,
            value: raw.to_string(),
        }),
    }
}

fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() { None } else { Some(value) }
}

fn mask(key: &str) -> String {
    let prefix: String = key.chars().take(8).collect();
    format!("{prefix}...")
}
