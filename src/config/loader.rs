//! Configuration structures and loading logic.

use crate::config::modes::ListingSort;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub target: TargetConfig,

    #[serde(default)]
    pub filter: FilterConfig,

    #[serde(default)]
    pub options: OptionsConfig,
}

/// What to harvest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetConfig {
    /// Subreddit name, without the `r/` prefix.
    #[serde(default = "default_subreddit")]
    pub subreddit: String,

    /// Free-text search query. Switches to the search endpoint when set.
    #[serde(default)]
    pub query: Option<String>,

    /// Listing order.
    #[serde(default)]
    pub sort: ListingSort,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            subreddit: default_subreddit(),
            query: None,
            sort: ListingSort::default(),
        }
    }
}

/// Media dimension filter. At most one of the two may be set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Exact `[width, height]` to accept.
    #[serde(default)]
    pub resolution: Option<[u32; 2]>,

    /// `[width, height]` ratio to accept, e.g. `[16, 9]`.
    #[serde(default)]
    pub aspect_ratio: Option<[u32; 2]>,
}

/// Harvest options configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionsConfig {
    /// Root folder for downloaded media and the cursor file.
    #[serde(default = "default_download_directory")]
    pub download_directory: PathBuf,

    /// Download media hosted on redgifs (suppressed by default, the host
    /// tends to hang indefinitely in some regions).
    #[serde(default)]
    pub allow_redgifs: bool,

    /// Posts requested per page (API maximum is 100).
    #[serde(default = "default_page_limit")]
    pub page_limit: u32,

    /// Upper bound on posts processed at the same time within a page.
    #[serde(default = "default_max_concurrent_items")]
    pub max_concurrent_items: usize,

    /// Random delay range `[min, max]` in milliseconds between page requests.
    #[serde(default = "default_page_delay")]
    pub page_delay_ms: [u64; 2],

    /// Seconds to wait after a failed page request.
    #[serde(default = "default_retry_delay")]
    pub retry_delay_secs: u64,

    /// Stop after this many pages. Unlimited when unset.
    #[serde(default)]
    pub max_batches: Option<u64>,

    /// HTTP request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// User agent sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// API base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Whether to log every saved file.
    #[serde(default = "default_true")]
    pub show_downloads: bool,
}

impl Default for OptionsConfig {
    fn default() -> Self {
        Self {
            download_directory: default_download_directory(),
            allow_redgifs: false,
            page_limit: default_page_limit(),
            max_concurrent_items: default_max_concurrent_items(),
            page_delay_ms: default_page_delay(),
            retry_delay_secs: default_retry_delay(),
            max_batches: None,
            request_timeout_secs: default_request_timeout(),
            user_agent: default_user_agent(),
            base_url: default_base_url(),
            show_downloads: true,
        }
    }
}

fn default_subreddit() -> String {
    "wallpapers".to_string()
}

fn default_download_directory() -> PathBuf {
    PathBuf::from("downloads")
}

fn default_page_limit() -> u32 {
    100
}

fn default_max_concurrent_items() -> usize {
    16
}

fn default_page_delay() -> [u64; 2] {
    [1000, 2000]
}

fn default_retry_delay() -> u64 {
    10
}

fn default_request_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!(
        "{}/{} (media harvester)",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    )
}

fn default_base_url() -> String {
    "https://www.reddit.com".to_string()
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::Config(format!("Configuration file not found: {}", path.display()))
            } else {
                Error::Io(e)
            }
        })?;

        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Path of the persisted cursor file.
    pub fn cursor_path(&self) -> PathBuf {
        self.options.download_directory.join(crate::fs::CURSOR_FILE_NAME)
    }
}
