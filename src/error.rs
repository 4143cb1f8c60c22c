//! Error taxonomy for the scan pipeline and its collaborators.
//!
//! Every variant here is recoverable from the scheduler's point of view: a
//! failure is logged against the target that produced it and the next tick
//! tries again. Only configuration and store-open errors at startup are
//! allowed to stop the process.

use std::path::PathBuf;
use thiserror::Error;

/// A page could not be retrieved for a target.
#[derive(Error, Debug)]
#[error("failed to fetch {target}: {cause}")]
pub struct FetchError {
    /// The URL that was being fetched.
    pub target: String,
    pub cause: FetchCause,
}

#[derive(Error, Debug)]
pub enum FetchCause {
    #[error("request timed out")]
    Timeout,

    #[error("server returned status {0}")]
    Status(u16),

    #[error("network error: {0}")]
    Network(String),
}

impl FetchError {
    pub fn new(target: impl Into<String>, cause: FetchCause) -> Self {
        Self {
            target: target.into(),
            cause,
        }
    }

    /// Classify a reqwest failure for `target`.
    pub fn from_reqwest(target: &str, e: reqwest::Error) -> Self {
        let cause = if e.is_timeout() {
            FetchCause::Timeout
        } else if let Some(status) = e.status() {
            FetchCause::Status(status.as_u16())
        } else {
            FetchCause::Network(e.to_string())
        };
        Self::new(target, cause)
    }
}

/// Fetched content could not be scanned.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("document is empty")]
    EmptyDocument,

    #[error("invalid selector `{0}`")]
    Selector(String),
}

/// A scan stopped before reaching the notification gate.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// An alert could not be delivered.
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("notification endpoint returned status {status}: {body}")]
    Rejected { status: u16, body: String },
}

impl From<reqwest::Error> for NotifyError {
    fn from(e: reqwest::Error) -> Self {
        NotifyError::Transport(e.to_string())
    }
}

/// The target store could not be read or written.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("target {0} not found")]
    NotFound(u64),

    #[error("store I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("store file {path:?} is malformed: {source}")]
    Serde {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid target: {0}")]
    Invalid(String),
}

/// Configuration could not be loaded or is inconsistent.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config file {path:?} is malformed: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
