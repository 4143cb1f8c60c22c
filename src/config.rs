//! Runtime configuration.
//!
//! Settings come from an optional YAML file; every key has a default, so an
//! empty or missing file is a valid configuration. Command-line flags are
//! applied on top by `main`.
//!
//! ```yaml
//! interval_secs: 1800
//! fetch_timeout_secs: 20
//! concurrency: 8
//! store_path: perseus.json
//! sentiment_source: heading
//! notify_retries: 2
//! notifier:
//!   kind: webhook
//!   url: https://mail-relay.internal/send
//!   from: "Perseus Alerts <alerts@example.com>"
//!   to: me@example.com
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

/// Which text the sentiment classifier scores. Fixed per process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SentimentSource {
    /// The matched heading or link text.
    #[default]
    Heading,
    /// The whole `<body>` text of the page.
    Body,
}

/// Where alerts are delivered.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum NotifierConfig {
    /// Alerts are written to the log only.
    #[default]
    Log,
    /// Alerts are POSTed as JSON to an HTTP endpoint (mail relay, chat hook).
    Webhook { url: String, from: String, to: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Seconds between ticks.
    pub interval_secs: u64,
    /// Per-request timeout for page fetches.
    pub fetch_timeout_secs: u64,
    /// Maximum number of targets processed at once within a tick.
    pub concurrency: usize,
    pub user_agent: String,
    /// JSON file holding the tracked targets.
    pub store_path: PathBuf,
    pub sentiment_source: SentimentSource,
    /// Extra delivery attempts per alert within a tick.
    pub notify_retries: usize,
    pub notifier: NotifierConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            interval_secs: 30 * 60,
            fetch_timeout_secs: 20,
            concurrency: 8,
            user_agent: concat!("perseus_watch/", env!("CARGO_PKG_VERSION")).to_string(),
            store_path: PathBuf::from("perseus.json"),
            sentiment_source: SentimentSource::Heading,
            notify_retries: 2,
            notifier: NotifierConfig::Log,
        }
    }
}

impl Config {
    /// Load configuration from `path`, or defaults when `path` is `None`.
    #[instrument(level = "info")]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml(&raw).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    fn from_yaml(raw: &str) -> Result<Self, serde_yaml::Error> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(raw)
    }

    /// Reject settings the scheduler cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.interval_secs == 0 {
            return Err(ConfigError::Invalid("interval_secs must be positive".into()));
        }
        if self.fetch_timeout_secs == 0 {
            return Err(ConfigError::Invalid("fetch_timeout_secs must be positive".into()));
        }
        if self.concurrency == 0 {
            return Err(ConfigError::Invalid("concurrency must be positive".into()));
        }
        if let NotifierConfig::Webhook { url, .. } = &self.notifier {
            url::Url::parse(url).map_err(|e| {
                ConfigError::Invalid(format!("notifier url `{url}` is not a valid URL: {e}"))
            })?;
        }
        Ok(())
    }
}
