//! Configuration file parser for ~/.config/cms-preview/config.toml.
//!
//! The config file is optional: a missing file yields `Config::default()`.
//! Unknown keys are accepted by serde and reported with a warning, since they
//! are most likely typos.
use secrecy::SecretString;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::content::Granularity;

/// Environment variable that overrides `api_token` from the file.
pub const TOKEN_ENV_VAR: &str = "CMS_API_TOKEN";

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file too large: {size} bytes (max {max} bytes)")]
    TooLarge { size: u64, max: u64 },
}

// ============================================================================
// Configuration
// ============================================================================

/// Top-level application configuration. Any subset of keys may be given.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root URL of the CMS, without the `/api` suffix.
    pub api_base_url: String,

    /// Bearer token for the content API. `CMS_API_TOKEN` takes precedence.
    pub api_token: Option<String>,

    /// Theme variant name ("dark" or "light").
    pub theme: String,

    /// Record granularity fetched when `--source` is not given.
    pub source: Granularity,

    pub request_timeout_secs: u64,

    pub max_retries: u32,

    /// Screen background used when neither a collection nor a sub-section
    /// sets one.
    pub default_bg_color: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:1337".to_string(),
            api_token: None,
            theme: "dark".to_string(),
            source: Granularity::default(),
            request_timeout_secs: 30,
            max_retries: 3,
            default_bg_color: None,
        }
    }
}

/// Mask `api_token` in Debug output.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_base_url", &self.api_base_url)
            .field("api_token", &self.api_token.as_ref().map(|_| "[REDACTED]"))
            .field("theme", &self.theme)
            .field("source", &self.source)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("default_bg_color", &self.default_bg_color)
            .finish()
    }
}

const KNOWN_KEYS: [&str; 7] = [
    "api_base_url",
    "api_token",
    "theme",
    "source",
    "request_timeout_secs",
    "max_retries",
    "default_bg_color",
];

impl Config {
    const MAX_FILE_SIZE: u64 = 1_048_576;
    const MAX_RETRIES: u32 = 10;

    /// Load configuration from a TOML file.
    ///
    /// - Missing or blank file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown keys → accepted, logged as warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge {
                    size: meta.len(),
                    max: Self::MAX_FILE_SIZE,
                });
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        let config = Self::parse(&content)?;
        tracing::info!(
            path = %path.display(),
            api_base_url = %config.api_base_url,
            source = config.source.name(),
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Parse TOML text, warning about keys this version does not know.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        Ok(toml::from_str(content)?)
    }

    /// Default config location: `~/.config/cms-preview/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        config_dir().map(|dir| dir.join("config.toml"))
    }

    /// API token, preferring the environment over the file.
    pub fn api_token(&self) -> Option<SecretString> {
        resolve_token(std::env::var(TOKEN_ENV_VAR).ok(), self.api_token.as_deref())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Retry budget for transient API failures, at most `MAX_RETRIES`.
    pub fn max_retries(&self) -> u32 {
        self.max_retries.min(Self::MAX_RETRIES)
    }
}

/// `~/.config/cms-preview/`, or `None` when `HOME` is unset.
pub fn config_dir() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config").join("cms-preview"))
}

fn resolve_token(env: Option<String>, file: Option<&str>) -> Option<SecretString> {
    env.filter(|t| !t.trim().is_empty())
        .or_else(|| file.map(str::to_string).filter(|t| !t.trim().is_empty()))
        .map(|t| SecretString::from(t.trim().to_string()))
}

// ============================================================================
// Tests
// ============================================================================
