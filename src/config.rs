//! Configuration for talking to the flyer backend.
//!
//! All client behaviour is controlled through [`ClientConfig`], built via
//! its [`ClientConfigBuilder`]. Callers set only what they care about and
//! rely on the documented defaults for the rest.

use crate::error::FlyerError;
use reqwest::Url;
use serde::{Deserialize, Serialize};

/// Default backend address (the backend's stock development port).
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

/// Default size cap for picked images: 100 MiB.
pub const DEFAULT_MAX_IMAGE_BYTES: u64 = 100 * 1024 * 1024;

/// Client configuration.
///
/// Built via [`ClientConfig::builder()`] or using [`ClientConfig::default()`].
///
/// # Example
/// ```rust
/// use flyer_client::ClientConfig;
///
/// let config = ClientConfig::builder()
///     .base_url("http://localhost:8080")
///     .pdf_resolution(300)
///     .build()
///     .unwrap();
/// assert_eq!(config.pdf_resolution, 300);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Backend root URL; endpoints are resolved against it. Default: `http://127.0.0.1:5000`.
    pub base_url: String,

    /// Rasterisation DPI requested from the panel extractor. Range: 72–600. Default: 400.
    ///
    /// The backend caps the page bitmap on its side, so high values are safe
    /// but slow for large dielines.
    pub pdf_resolution: u32,

    /// Largest image file accepted by `add_images`, in bytes. Default: 100 MiB.
    pub max_image_bytes: u64,

    /// Number of image files read concurrently. Default: 4.
    pub read_concurrency: usize,

    /// Whole-request timeout in seconds. Default: 300.
    ///
    /// Flyer composition runs an image model server-side and routinely takes
    /// a minute or more.
    pub request_timeout_secs: u64,

    /// TCP connect timeout in seconds. Default: 10.
    pub connect_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            pdf_resolution: 400,
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
            read_concurrency: 4,
            request_timeout_secs: 300,
            connect_timeout_secs: 10,
        }
    }
}

impl ClientConfig {
    /// Create a new builder for `ClientConfig`.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder {
            config: Self::default(),
        }
    }

    /// Parsed form of [`Self::base_url`].
    pub fn parsed_base_url(&self) -> Result<Url, FlyerError> {
        let url = Url::parse(&self.base_url).map_err(|e| {
            FlyerError::InvalidConfig(format!("base URL '{}' is invalid: {}", self.base_url, e))
        })?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(FlyerError::InvalidConfig(format!(
                "base URL must be http or https, got '{other}'"
            ))),
        }
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    pub fn pdf_resolution(mut self, dpi: u32) -> Self {
        self.config.pdf_resolution = dpi.clamp(72, 600);
        self
    }

    pub fn max_image_bytes(mut self, bytes: u64) -> Self {
        self.config.max_image_bytes = bytes;
        self
    }

    pub fn read_concurrency(mut self, n: usize) -> Self {
        self.config.read_concurrency = n.max(1);
        self
    }

    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.config.request_timeout_secs = secs;
        self
    }

    pub fn connect_timeout_secs(mut self, secs: u64) -> Self {
        self.config.connect_timeout_secs = secs;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ClientConfig, FlyerError> {
        let c = &self.config;
        c.parsed_base_url()?;
        if c.max_image_bytes == 0 {
            return Err(FlyerError::InvalidConfig(
                "Image size limit must be > 0".into(),
            ));
        }
        if c.request_timeout_secs == 0 {
            return Err(FlyerError::InvalidConfig(
                "Request timeout must be ≥ 1s".into(),
            ));
        }
        Ok(self.config)
    }
}
