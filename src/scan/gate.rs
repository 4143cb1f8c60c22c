//! Notification gate: decides whether a match is new for its target.
//!
//! Each target is either `Unseen` (never alerted) or `Seen(article)` where
//! `article` is the normalized link of the last alert. A match fires when
//! its normalized link differs from the stored one. Only the last value is
//! remembered, so a page flipping between two articles re-alerts on each
//! flip.

use crate::models::{Match, ScanOutcome, Sentiment, Target};
use crate::normalize::normalize;

/// Dedup state of a target, derived from its stored record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationState {
    Unseen,
    Seen(String),
}

impl NotificationState {
    pub fn of(target: &Target) -> Self {
        match &target.last_notified_article {
            Some(article) => NotificationState::Seen(article.clone()),
            None => NotificationState::Unseen,
        }
    }
}

/// Evaluate a fresh match against the target's state.
///
/// On `NewMatch` the returned match carries the normalized link, which is
/// exactly what the caller must persist after notifying.
pub fn evaluate(target: &Target, mut found: Match, sentiment: Sentiment) -> ScanOutcome {
    let candidate = normalize(&found.link);
    match NotificationState::of(target) {
        NotificationState::Seen(article) if article == candidate => ScanOutcome::AlreadyNotified,
        _ => {
            found.link = candidate;
            ScanOutcome::NewMatch { found, sentiment }
        }
    }
}
