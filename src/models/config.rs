//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Upstream service locations
    #[serde(default)]
    pub endpoints: Endpoints,

    /// HTTP client behavior
    #[serde(default)]
    pub http: HttpConfig,

    /// Defaults for a download run
    #[serde(default)]
    pub download: DownloadConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("endpoints.api_base", &self.endpoints.api_base),
            ("endpoints.mirror_base", &self.endpoints.mirror_base),
        ] {
            let parsed = url::Url::parse(value)?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(AppError::validation(format!(
                    "{field} must use http or https"
                )));
            }
        }
        if self.http.user_agent.trim().is_empty() {
            return Err(AppError::validation("http.user_agent is empty"));
        }
        if self.http.listing_timeout_secs == 0 || self.http.item_timeout_secs == 0 {
            return Err(AppError::validation("http timeouts must be > 0"));
        }
        if self.download.concurrency == 0 {
            return Err(AppError::validation("download.concurrency must be > 0"));
        }
        Ok(())
    }
}

/// Base URLs of the listing and item services.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Endpoints {
    /// Iconify API base, used for listings and SVG rendering
    #[serde(default = "defaults::api_base")]
    pub api_base: String,

    /// Raw JSON mirror base, `<mirror_base>/<key>.json`
    #[serde(default = "defaults::mirror_base")]
    pub mirror_base: String,
}

impl Endpoints {
    /// Join a path onto the API base.
    pub fn api(&self, path: &str) -> String {
        format!("{}/{}", self.api_base.trim_end_matches('/'), path)
    }

    /// Join a path onto the mirror base.
    pub fn mirror(&self, path: &str) -> String {
        format!("{}/{}", self.mirror_base.trim_end_matches('/'), path)
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            api_base: defaults::api_base(),
            mirror_base: defaults::mirror_base(),
        }
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Timeout for listing requests in seconds
    #[serde(default = "defaults::listing_timeout")]
    pub listing_timeout_secs: u64,

    /// Timeout for a single SVG request in seconds
    #[serde(default = "defaults::item_timeout")]
    pub item_timeout_secs: u64,

    /// TCP connect timeout in seconds
    #[serde(default = "defaults::connect_timeout")]
    pub connect_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            listing_timeout_secs: defaults::listing_timeout(),
            item_timeout_secs: defaults::item_timeout(),
            connect_timeout_secs: defaults::connect_timeout(),
        }
    }
}

/// Download run defaults, overridable from the command line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Output directory
    #[serde(default = "defaults::out_dir")]
    pub out_dir: PathBuf,

    /// Maximum concurrent SVG requests
    #[serde(default = "defaults::concurrency")]
    pub concurrency: usize,

    /// Requested icon height in pixels
    #[serde(default)]
    pub size: Option<u32>,

    /// Replace files that already exist
    #[serde(default)]
    pub overwrite: bool,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            out_dir: defaults::out_dir(),
            concurrency: defaults::concurrency(),
            size: None,
            overwrite: false,
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    pub fn api_base() -> String {
        "https://api.iconify.design".into()
    }
    pub fn mirror_base() -> String {
        "https://raw.githubusercontent.com/iconify/icon-sets/master/json".into()
    }
    pub fn user_agent() -> String {
        concat!("iconify-dl/", env!("CARGO_PKG_VERSION")).into()
    }
    pub fn listing_timeout() -> u64 {
        60
    }
    pub fn item_timeout() -> u64 {
        40
    }
    pub fn connect_timeout() -> u64 {
        10
    }
    pub fn out_dir() -> PathBuf {
        PathBuf::from("./iconify_svgs")
    }
    pub fn concurrency() -> usize {
        12
    }
}
