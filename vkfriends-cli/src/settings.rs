//! Optional settings file for values that rarely change between runs.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use vkfriends_core::{
    DEFAULT_API_URL, DEFAULT_API_VERSION, DEFAULT_COUNT, DEFAULT_FIELDS, DEFAULT_REQUEST_TIMEOUT,
};

/// Settings loaded from `settings.json`. Every field may be omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// API base URL.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// API version.
    #[serde(default = "default_api_version")]
    pub api_version: String,
    /// Request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
    /// Fields requested for every friend.
    #[serde(default = "default_fields")]
    pub fields: Vec<String>,
    /// Page size.
    #[serde(default = "default_count")]
    pub count: u32,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

fn default_request_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT.as_secs()
}

fn default_fields() -> Vec<String> {
    DEFAULT_FIELDS.iter().map(ToString::to_string).collect()
}

fn default_count() -> u32 {
    DEFAULT_COUNT
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            api_version: default_api_version(),
            request_timeout: default_request_timeout(),
            fields: default_fields(),
            count: default_count(),
        }
    }
}

impl Settings {
    /// Returns the default settings file path.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("vk-friends")
            .join("settings.json")
    }

    /// Loads settings from `path`, or from the default path when `None`.
    ///
    /// A missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => Self::load_from(&Self::default_path()),
        }
    }

    /// Loads settings from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "Settings file not found, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        let settings: Settings = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse settings file {}", path.display()))?;

        info!(path = %path.display(), "Loaded settings");
        Ok(settings)
    }

    /// Request timeout as a duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }
}
