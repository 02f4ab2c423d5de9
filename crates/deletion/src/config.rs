//! Deletion configuration.
//!
//! Loaded once from TOML and handed to the orchestrator at construction:
//!
//! ```toml
//! admin_key = "change-me"
//! attachments_dir = "/var/lib/userpurge/attachments"
//! previews_dir = "/var/lib/userpurge/previews"
//! call_timeout_secs = 30
//!
//! [series]
//! host = "localhost"
//! port = 8086
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use userpurge_file_ops::expand_home;
use userpurge_protocol::DEFAULT_CALL_TIMEOUT;

/// Errors produced while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),

    #[error("time-series store configured at {host} but none provided")]
    SeriesStoreMissing { host: String },
}

/// Connection settings for the optional time-series store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesConfig {
    pub host: String,
    #[serde(default = "default_series_port")]
    pub port: u16,
}

fn default_series_port() -> u16 {
    8086
}

/// On-disk config format.
#[derive(Debug, Deserialize)]
struct ConfigFile {
    admin_key: String,
    attachments_dir: String,
    previews_dir: String,
    #[serde(default = "default_call_timeout_secs")]
    call_timeout_secs: u64,
    #[serde(default)]
    series: Option<SeriesConfig>,
}

fn default_call_timeout_secs() -> u64 {
    DEFAULT_CALL_TIMEOUT.as_secs()
}

/// Everything the orchestrator needs to know about the deployment.
#[derive(Clone)]
pub struct DeletionConfig {
    /// Secret the caller credential is compared against.
    pub admin_key: String,
    /// Base directories holding per-account subdirectories, in check order.
    pub base_paths: Vec<PathBuf>,
    /// Time-series store settings; `None` when the subsystem is disabled.
    pub series: Option<SeriesConfig>,
    /// Upper bound for each external call.
    pub call_timeout: Duration,
}

impl fmt::Debug for DeletionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeletionConfig")
            .field("admin_key", &"<redacted>")
            .field("base_paths", &self.base_paths)
            .field("series", &self.series)
            .field("call_timeout", &self.call_timeout)
            .finish()
    }
}

impl DeletionConfig {
    pub fn new(admin_key: impl Into<String>, base_paths: Vec<PathBuf>) -> Self {
        Self {
            admin_key: admin_key.into(),
            base_paths,
            series: None,
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }

    pub fn with_series(mut self, series: SeriesConfig) -> Self {
        self.series = Some(series);
        self
    }

    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    /// Loads and validates configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), "deletion configuration loaded");
        Ok(config)
    }

    /// Parses and validates configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(content)?;

        let config = Self {
            admin_key: file.admin_key,
            base_paths: vec![
                expand_home(&file.attachments_dir),
                expand_home(&file.previews_dir),
            ],
            series: file.series,
            call_timeout: Duration::from_secs(file.call_timeout_secs),
        };
        config.validate()?;
        Ok(config)
    }

    /// Rejects configurations the orchestrator cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.admin_key.trim().is_empty() {
            return Err(ConfigError::Invalid("admin_key must not be empty".into()));
        }
        if self.base_paths.is_empty() {
            return Err(ConfigError::Invalid("no base directories configured".into()));
        }
        if let Some(path) = self.base_paths.iter().find(|p| p.as_os_str().is_empty()) {
            return Err(ConfigError::Invalid(format!(
                "empty base directory path {path:?}"
            )));
        }
        if self.call_timeout.is_zero() {
            return Err(ConfigError::Invalid("call_timeout_secs must be > 0".into()));
        }
        if let Some(series) = &self.series {
            if series.host.is_empty() {
                return Err(ConfigError::Invalid("series.host must not be empty".into()));
            }
        }
        Ok(())
    }

    /// Builds the InfluxDB store described by `[series]`, if any.
    #[cfg(feature = "influx")]
    pub fn series_store(&self) -> Option<std::sync::Arc<dyn userpurge_stores::SeriesStore>> {
        self.series.as_ref().map(|s| {
            std::sync::Arc::new(userpurge_stores::InfluxSeries::new(&s.host, s.port))
                as std::sync::Arc<dyn userpurge_stores::SeriesStore>
        })
    }
}
