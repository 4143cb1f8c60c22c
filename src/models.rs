//! Data models shared by the scan pipeline, the store and the notifiers.
//!
//! - [`Target`]: a tracked page/keyword pair and its dedup state (persisted)
//! - [`Match`]: the heading/link pair found on one scan (transient)
//! - [`Sentiment`]: lexicon score of the matched text (transient)
//! - [`ScanOutcome`]: what the notification gate decided for one scan

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A tracked page and the keyword searched for on it.
///
/// `last_notified_article` is always written in normalized form (see
/// [`crate::normalize::normalize`]), so the gate can compare it to a fresh
/// candidate with plain string equality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    /// Store-assigned identifier.
    pub id: u64,
    /// The page that is fetched every tick.
    pub url: String,
    /// Case-insensitive substring searched for in headings and links.
    pub keyword: String,
    /// Normalized link of the last article an alert was sent for.
    #[serde(default)]
    pub last_notified_article: Option<String>,
    /// When that alert was sent.
    #[serde(default)]
    pub last_notified_at: Option<DateTime<Utc>>,
}

impl Target {
    pub fn new(id: u64, url: impl Into<String>, keyword: impl Into<String>) -> Self {
        Self {
            id,
            url: url.into(),
            keyword: keyword.into(),
            last_notified_article: None,
            last_notified_at: None,
        }
    }
}

/// The first element on a page whose text contains the keyword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    /// Text of the matched heading or link, whitespace collapsed.
    pub heading: String,
    /// Absolute, normalized link to the matched article.
    pub link: String,
    /// Text the sentiment policy scores (heading or page body).
    pub source_text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SentimentLabel::Positive => "Positive",
            SentimentLabel::Neutral => "Neutral",
            SentimentLabel::Negative => "Negative",
        };
        f.write_str(s)
    }
}

/// Lexicon score of a piece of text and the bucket it falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentiment {
    pub score: i32,
    pub label: SentimentLabel,
}

/// Result of scanning one target in one tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// No heading or link on the page contains the keyword.
    NoMatch,
    /// The matched article is the one already alerted for.
    AlreadyNotified,
    /// A different article matched; it must be notified and recorded.
    NewMatch { found: Match, sentiment: Sentiment },
}
