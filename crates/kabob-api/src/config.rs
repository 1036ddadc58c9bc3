//! # Storefront Configuration
//!
//! Where the store API lives and how long the post-order reset waits.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     KABOB_API_URL=http://store.local:8000/api                          │
//! │     KABOB_RESET_DELAY_MS=3000                                          │
//! │     KABOB_REQUEST_TIMEOUT_SECS=30                                      │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/storefront/storefront.toml (Linux)                       │
//! │     ~/Library/Application Support/com.kabob.storefront/... (macOS)     │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     http://localhost:8000/api, no timeout, 3000 ms reset               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # storefront.toml
//! [api]
//! base_url = "http://localhost:8000/api"
//! request_timeout_secs = 30   # optional, unset = no timeout
//!
//! [session]
//! reset_delay_ms = 3000
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{ApiError, ApiResult};

/// Config file name inside the platform config directory.
pub const CONFIG_FILE_NAME: &str = "storefront.toml";

// =============================================================================
// API Settings
// =============================================================================

/// Remote store API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Base URL every endpoint is joined onto (`{base}/menu`, `{base}/orders`).
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Whole-request timeout. `None` means the request waits indefinitely.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    "http://localhost:8000/api".to_string()
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            base_url: default_base_url(),
            request_timeout_secs: None,
        }
    }
}

// =============================================================================
// Session Settings
// =============================================================================

/// Session behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Delay between a successful order and the cart/customer reset.
    #[serde(default = "default_reset_delay")]
    pub reset_delay_ms: u64,
}

fn default_reset_delay() -> u64 {
    3000
}

impl Default for SessionSettings {
    fn default() -> Self {
        SessionSettings {
            reset_delay_ms: default_reset_delay(),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete storefront configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub session: SessionSettings,
}

impl ApiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Config pointing at an explicit base URL, everything else default.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let mut config = Self::default();
        config.api.base_url = base_url.into();
        config
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (storefront.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ApiResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading storefront config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load storefront config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ApiResult<()> {
        self.base_url()?;

        if self.api.request_timeout_secs == Some(0) {
            return Err(ApiError::InvalidConfig(
                "request_timeout_secs must be greater than 0 when set".into(),
            ));
        }

        Ok(())
    }

    /// Parses the base URL, requiring an http or https scheme.
    pub fn base_url(&self) -> ApiResult<Url> {
        let url = Url::parse(&self.api.base_url)?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(ApiError::InvalidUrl(format!(
                "API URL must use http:// or https://, got scheme '{}' in {}",
                other, self.api.base_url
            ))),
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.api.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn reset_delay(&self) -> Duration {
        Duration::from_millis(self.session.reset_delay_ms)
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any key lookup.
    ///
    /// Unparseable numeric values are logged and ignored.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("KABOB_API_URL") {
            debug!(url = %url, "Overriding API URL from environment");
            self.api.base_url = url;
        }

        if let Some(delay) = lookup("KABOB_RESET_DELAY_MS") {
            match delay.parse::<u64>() {
                Ok(ms) => {
                    debug!(reset_delay_ms = ms, "Overriding reset delay from environment");
                    self.session.reset_delay_ms = ms;
                }
                Err(_) => warn!(value = %delay, "Ignoring invalid KABOB_RESET_DELAY_MS"),
            }
        }

        if let Some(timeout) = lookup("KABOB_REQUEST_TIMEOUT_SECS") {
            match timeout.parse::<u64>() {
                Ok(secs) => self.api.request_timeout_secs = Some(secs),
                Err(_) => warn!(value = %timeout, "Ignoring invalid KABOB_REQUEST_TIMEOUT_SECS"),
            }
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "kabob", "storefront")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }
}
