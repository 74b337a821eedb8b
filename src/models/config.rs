//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP client behavior
    #[serde(default)]
    pub http: HttpConfig,

    /// Sites to scrape
    #[serde(default)]
    pub sites: SitesConfig,

    /// Filesystem locations
    #[serde(default)]
    pub paths: PathsConfig,

    /// Log sink settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration, or defaults when the file does not exist.
    pub fn load_if_exists(path: impl AsRef<Path>) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.http.user_agent.trim().is_empty() {
            return Err(AppError::validation("http.user_agent is empty"));
        }
        if self.http.timeout_secs == 0 {
            return Err(AppError::validation("http.timeout_secs must be > 0"));
        }
        if self.http.max_concurrent == 0 {
            return Err(AppError::validation("http.max_concurrent must be > 0"));
        }
        if !matches!(
            self.http.encoding.to_ascii_lowercase().as_str(),
            "utf-8" | "utf8"
        ) {
            return Err(AppError::validation(format!(
                "http.encoding '{}' is not supported",
                self.http.encoding
            )));
        }
        url::Url::parse(&self.sites.docs_url)
            .map_err(|e| AppError::validation(format!("sites.docs_url: {e}")))?;
        url::Url::parse(&self.sites.peps_url)
            .map_err(|e| AppError::validation(format!("sites.peps_url: {e}")))?;
        if self.logging.max_bytes == 0 {
            return Err(AppError::validation("logging.max_bytes must be > 0"));
        }
        Ok(())
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Maximum concurrent requests in per-item loops
    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,

    /// Text encoding applied to fetched pages
    #[serde(default = "defaults::encoding")]
    pub encoding: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            max_concurrent: defaults::max_concurrent(),
            encoding: defaults::encoding(),
        }
    }
}

/// Entry points of the scraped sites.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SitesConfig {
    /// Python documentation root
    #[serde(default = "defaults::docs_url")]
    pub docs_url: String,

    /// PEP index root
    #[serde(default = "defaults::peps_url")]
    pub peps_url: String,
}

impl Default for SitesConfig {
    fn default() -> Self {
        Self {
            docs_url: defaults::docs_url(),
            peps_url: defaults::peps_url(),
        }
    }
}

/// Filesystem layout. Every directory is relative to `base_dir`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "defaults::base_dir")]
    pub base_dir: PathBuf,

    #[serde(default = "defaults::cache_dir")]
    pub cache_dir: String,

    #[serde(default = "defaults::downloads_dir")]
    pub downloads_dir: String,

    #[serde(default = "defaults::results_dir")]
    pub results_dir: String,

    #[serde(default = "defaults::logs_dir")]
    pub logs_dir: String,
}

impl PathsConfig {
    pub fn cache_path(&self) -> PathBuf {
        self.base_dir.join(&self.cache_dir)
    }

    pub fn downloads_path(&self) -> PathBuf {
        self.base_dir.join(&self.downloads_dir)
    }

    pub fn results_path(&self) -> PathBuf {
        self.base_dir.join(&self.results_dir)
    }

    pub fn logs_path(&self) -> PathBuf {
        self.base_dir.join(&self.logs_dir)
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            base_dir: defaults::base_dir(),
            cache_dir: defaults::cache_dir(),
            downloads_dir: defaults::downloads_dir(),
            results_dir: defaults::results_dir(),
            logs_dir: defaults::logs_dir(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Minimum level: debug, info, warn or error
    #[serde(default = "defaults::log_level")]
    pub level: String,

    /// Log file name inside `paths.logs_dir`
    #[serde(default = "defaults::log_file")]
    pub file_name: String,

    /// Rotate the log file once it grows past this size
    #[serde(default = "defaults::log_max_bytes")]
    pub max_bytes: u64,

    /// Number of rotated files to keep
    #[serde(default = "defaults::log_backups")]
    pub backup_count: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
            file_name: defaults::log_file(),
            max_bytes: defaults::log_max_bytes(),
            backup_count: defaults::log_backups(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    // HTTP defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; pydoc-crawler/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn max_concurrent() -> usize {
        5
    }
    pub fn encoding() -> String {
        "utf-8".into()
    }

    // Site defaults
    pub fn docs_url() -> String {
        "https://docs.python.org/3/".into()
    }
    pub fn peps_url() -> String {
        "https://peps.python.org/".into()
    }

    // Path defaults
    pub fn base_dir() -> PathBuf {
        PathBuf::from(".")
    }
    pub fn cache_dir() -> String {
        ".http_cache".into()
    }
    pub fn downloads_dir() -> String {
        "downloads".into()
    }
    pub fn results_dir() -> String {
        "results".into()
    }
    pub fn logs_dir() -> String {
        "logs".into()
    }

    // Logging defaults
    pub fn log_level() -> String {
        "info".into()
    }
    pub fn log_file() -> String {
        "parser.log".into()
    }
    pub fn log_max_bytes() -> u64 {
        1_000_000
    }
    pub fn log_backups() -> usize {
        5
    }
}
