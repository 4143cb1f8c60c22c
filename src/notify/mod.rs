//! Alert delivery.
//!
//! The scheduler hands an [`Alert`] to a [`Notifier`]. Delivery failures are
//! reported back so the target's state is not advanced; the same article is
//! then offered again on the next tick.
//!
//! # Channels
//!
//! | Channel | Type | Notes |
//! |---------|------|-------|
//! | Log | [`log::LogNotifier`] | writes the alert to the tracing log |
//! | Webhook | [`webhook::WebhookNotifier`] | JSON POST to a mail relay or chat hook |
//!
//! [`retry::RetryNotifier`] wraps any channel with bounded backoff, and
//! [`AlertChannel`] selects the configured channel at runtime.

pub mod log;
pub mod retry;
pub mod webhook;

use crate::config::NotifierConfig;
use crate::error::NotifyError;
use crate::models::{Match, Sentiment, SentimentLabel, Target};
use crate::utils::escape_html;
use std::time::Duration;

/// Everything needed to tell a user about a new matching article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub target_url: String,
    pub keyword: String,
    pub heading: String,
    pub link: String,
    pub sentiment_label: SentimentLabel,
    pub sentiment_score: i32,
}

impl Alert {
    pub fn new(target: &Target, found: &Match, sentiment: Sentiment) -> Self {
        Self {
            target_url: target.url.clone(),
            keyword: target.keyword.clone(),
            heading: found.heading.clone(),
            link: found.link.clone(),
            sentiment_label: sentiment.label,
            sentiment_score: sentiment.score,
        }
    }

    pub fn subject(&self) -> String {
        format!(
            "Keyword Alert: \"{}\" found on {}",
            self.keyword, self.target_url
        )
    }

    /// HTML body; keyword, heading and link are escaped.
    pub fn html_body(&self) -> String {
        format!(
            "<p>The keyword <strong>\"{keyword}\"</strong> was found in the article titled:</p>\n\
             <h2>{heading}</h2>\n\
             <p>Sentiment: {label} ({score})</p>\n\
             <p>You can read the article by clicking <a href=\"{link}\">here</a>.</p>\n",
            keyword = escape_html(&self.keyword),
            heading = escape_html(&self.heading),
            label = self.sentiment_label,
            score = self.sentiment_score,
            link = escape_html(&self.link),
        )
    }

    pub fn text_body(&self) -> String {
        format!(
            "The keyword \"{}\" was found in the article titled:\n\n  {}\n\nSentiment: {} ({})\nRead it at: {}\n",
            self.keyword, self.heading, self.sentiment_label, self.sentiment_score, self.link
        )
    }
}

/// Delivers alerts.
pub trait Notifier {
    async fn send(&self, alert: &Alert) -> Result<(), NotifyError>;
}

/// The notifier selected by configuration.
#[derive(Debug)]
pub enum AlertChannel {
    Log(log::LogNotifier),
    Webhook(webhook::WebhookNotifier),
}

impl AlertChannel {
    /// Build the configured channel; webhook requests share `timeout`.
    pub fn from_config(config: &NotifierConfig, timeout: Duration) -> Result<Self, NotifyError> {
        Ok(match config {
            NotifierConfig::Log => AlertChannel::Log(log::LogNotifier),
            NotifierConfig::Webhook { url, from, to } => AlertChannel::Webhook(
                webhook::WebhookNotifier::new(url.clone(), from.clone(), to.clone(), timeout)?,
            ),
        })
    }
}

impl Notifier for AlertChannel {
    async fn send(&self, alert: &Alert) -> Result<(), NotifyError> {
        match self {
            AlertChannel::Log(n) => n.send(alert).await,
            AlertChannel::Webhook(n) => n.send(alert).await,
        }
    }
}
