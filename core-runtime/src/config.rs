//! # Presence Configuration
//!
//! Settings for the now-playing presence pipeline.
//!
//! ## Overview
//!
//! A [`PresenceConfig`] is built either explicitly through
//! [`PresenceConfig::builder`] or from environment variables through
//! [`PresenceConfig::from_env`]. Every unset field falls back to a default and
//! the result is validated before it is handed out, so a bad value fails at
//! startup instead of on the first file change.
//!
//! ## Environment Variables
//!
//! | Variable | Field | Default |
//! |----------|-------|---------|
//! | `NOWPLAYING_PATH` | `watch_path` | `<data dir>/vlc/now_playing.txt` |
//! | `DISCORD_CLIENT_ID` | `client_id` | [`DEFAULT_CLIENT_ID`] |
//! | `ARTWORK_UPLOAD_URL` | `upload_url` | [`DEFAULT_UPLOAD_URL`] |
//! | `NETWORK_TIMEOUT_SECS` | `http_timeout` | 30 s |
//! | `DEBOUNCE_MS` | `debounce` | 50 ms |
//! | `DEFAULT_IMAGE_KEY` | `default_image` | `vlc` |
//! | `SMALL_IMAGE_TEXT` | `small_image_text` | `VLC media player` |
//!
//! ## Usage
//!
//! ```
//! use core_runtime::config::PresenceConfig;
//! use std::time::Duration;
//!
//! let config = PresenceConfig::builder()
//!     .watch_path("/tmp/now_playing.txt")
//!     .debounce(Duration::from_millis(100))
//!     .build()
//!     .expect("valid config");
//!
//! assert_eq!(config.debounce, Duration::from_millis(100));
//! ```

use crate::error::{Error, Result};
use std::path::PathBuf;
use std::time::Duration;

/// Discord application whose assets (`vlc` image key) the activity refers to
pub const DEFAULT_CLIENT_ID: &str = "1396439427106078720";

/// Anonymous catbox.moe upload endpoint
pub const DEFAULT_UPLOAD_URL: &str = "https://catbox.moe/user/api.php";

/// Timeout applied to every network call (upload and presence)
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Quiet interval before a burst of writes is re-read
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(50);

/// Placeholder image key registered with the Discord application
pub const DEFAULT_IMAGE_KEY: &str = "vlc";

pub const DEFAULT_SMALL_IMAGE_TEXT: &str = "VLC media player";

const MAX_HTTP_TIMEOUT: Duration = Duration::from_secs(300);
const MAX_DEBOUNCE: Duration = Duration::from_secs(10);

pub const ENV_WATCH_PATH: &str = "NOWPLAYING_PATH";
pub const ENV_CLIENT_ID: &str = "DISCORD_CLIENT_ID";
pub const ENV_UPLOAD_URL: &str = "ARTWORK_UPLOAD_URL";
pub const ENV_HTTP_TIMEOUT: &str = "NETWORK_TIMEOUT_SECS";
pub const ENV_DEBOUNCE: &str = "DEBOUNCE_MS";
pub const ENV_DEFAULT_IMAGE: &str = "DEFAULT_IMAGE_KEY";
pub const ENV_SMALL_IMAGE_TEXT: &str = "SMALL_IMAGE_TEXT";

/// Configuration for the presence pipeline.
///
/// Use [`PresenceConfigBuilder`] or [`PresenceConfig::from_env`] to construct
/// instances; both validate before returning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceConfig {
    /// Text file the media player overwrites with now-playing metadata
    pub watch_path: PathBuf,

    /// Discord application (client) ID
    pub client_id: String,

    /// Multipart upload endpoint for artwork
    pub upload_url: String,

    /// Overall timeout for each network call
    pub http_timeout: Duration,

    /// Quiet interval for coalescing write bursts
    pub debounce: Duration,

    /// Image key shown when no artwork is available
    pub default_image: String,

    /// Caption for the small image
    pub small_image_text: String,
}

impl PresenceConfig {
    /// Creates a new builder for constructing a `PresenceConfig`.
    pub fn builder() -> PresenceConfigBuilder {
        PresenceConfigBuilder::default()
    }

    /// Loads configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEnv`] for unparsable numbers and
    /// [`Error::Config`] when the resulting configuration is invalid.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut builder = Self::builder();

        if let Some(path) = get(ENV_WATCH_PATH) {
            builder = builder.watch_path(path);
        }
        if let Some(client_id) = get(ENV_CLIENT_ID) {
            builder = builder.client_id(client_id.trim());
        }
        if let Some(url) = get(ENV_UPLOAD_URL) {
            builder = builder.upload_url(url.trim());
        }
        if let Some(secs) = get(ENV_HTTP_TIMEOUT) {
            let secs = parse_u64(ENV_HTTP_TIMEOUT, &secs)?;
            builder = builder.http_timeout(Duration::from_secs(secs));
        }
        if let Some(millis) = get(ENV_DEBOUNCE) {
            let millis = parse_u64(ENV_DEBOUNCE, &millis)?;
            builder = builder.debounce(Duration::from_millis(millis));
        }
        if let Some(key) = get(ENV_DEFAULT_IMAGE) {
            builder = builder.default_image(key.trim());
        }
        if let Some(text) = get(ENV_SMALL_IMAGE_TEXT) {
            builder = builder.small_image_text(text);
        }

        builder.build()
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - Watch path is not empty
    /// - Client ID is a non-empty numeric snowflake
    /// - Upload URL is an http(s) URL
    /// - Timeout and debounce are non-zero and within sane bounds
    /// - Default image key is not empty
    pub fn validate(&self) -> Result<()> {
        if self.watch_path.as_os_str().is_empty() {
            return Err(Error::Config("Watch path cannot be empty".to_string()));
        }

        if self.client_id.is_empty() || !self.client_id.chars().all(|c| c.is_ascii_digit()) {
            return Err(Error::Config(format!(
                "Discord client ID must be numeric, got '{}'",
                self.client_id
            )));
        }

        if !(self.upload_url.starts_with("https://") || self.upload_url.starts_with("http://")) {
            return Err(Error::Config(format!(
                "Upload URL must start with http:// or https://, got '{}'",
                self.upload_url
            )));
        }

        if self.http_timeout.is_zero() || self.http_timeout > MAX_HTTP_TIMEOUT {
            return Err(Error::Config(format!(
                "Network timeout must be between 1 and {} seconds",
                MAX_HTTP_TIMEOUT.as_secs()
            )));
        }

        if self.debounce.is_zero() || self.debounce > MAX_DEBOUNCE {
            return Err(Error::Config(format!(
                "Debounce interval must be between 1 and {} ms",
                MAX_DEBOUNCE.as_millis()
            )));
        }

        if self.default_image.trim().is_empty() {
            return Err(Error::Config("Default image key cannot be empty".to_string()));
        }

        Ok(())
    }
}

fn parse_u64(key: &str, value: &str) -> Result<u64> {
    value.trim().parse::<u64>().map_err(|e| Error::InvalidEnv {
        key: key.to_string(),
        message: format!("'{}' is not a non-negative integer ({})", value, e),
    })
}

/// Default location VLC's now-playing script writes to.
pub fn default_watch_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".local")
                .join("share")
        })
        .join("vlc")
        .join("now_playing.txt")
}

/// Builder for constructing [`PresenceConfig`] instances.
#[derive(Debug, Default)]
pub struct PresenceConfigBuilder {
    watch_path: Option<PathBuf>,
    client_id: Option<String>,
    upload_url: Option<String>,
    http_timeout: Option<Duration>,
    debounce: Option<Duration>,
    default_image: Option<String>,
    small_image_text: Option<String>,
}

impl PresenceConfigBuilder {
    /// Sets the now-playing file to watch.
    pub fn watch_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.watch_path = Some(path.into());
        self
    }

    /// Sets the Discord application ID.
    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Sets the artwork upload endpoint.
    pub fn upload_url(mut self, url: impl Into<String>) -> Self {
        self.upload_url = Some(url.into());
        self
    }

    /// Sets the overall network timeout.
    ///
    /// Default: 30 seconds
    pub fn http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = Some(timeout);
        self
    }

    /// Sets the debounce quiet interval.
    ///
    /// Default: 50 ms
    pub fn debounce(mut self, interval: Duration) -> Self {
        self.debounce = Some(interval);
        self
    }

    /// Sets the placeholder image key.
    pub fn default_image(mut self, key: impl Into<String>) -> Self {
        self.default_image = Some(key.into());
        self
    }

    /// Sets the small image caption.
    pub fn small_image_text(mut self, text: impl Into<String>) -> Self {
        self.small_image_text = Some(text.into());
        self
    }

    /// Builds the final configuration, filling defaults and validating.
    pub fn build(self) -> Result<PresenceConfig> {
        let config = PresenceConfig {
            watch_path: self.watch_path.unwrap_or_else(default_watch_path),
            client_id: self
                .client_id
                .unwrap_or_else(|| DEFAULT_CLIENT_ID.to_string()),
            upload_url: self
                .upload_url
                .unwrap_or_else(|| DEFAULT_UPLOAD_URL.to_string()),
            http_timeout: self.http_timeout.unwrap_or(DEFAULT_HTTP_TIMEOUT),
            debounce: self.debounce.unwrap_or(DEFAULT_DEBOUNCE),
            default_image: self
                .default_image
                .unwrap_or_else(|| DEFAULT_IMAGE_KEY.to_string()),
            small_image_text: self
                .small_image_text
                .unwrap_or_else(|| DEFAULT_SMALL_IMAGE_TEXT.to_string()),
        };

        config.validate()?;
        Ok(config)
    }
}
