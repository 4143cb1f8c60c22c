use super::{Alert, Notifier};
use crate::error::NotifyError;
use tracing::info;

/// Writes alerts to the log. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    async fn send(&self, alert: &Alert) -> Result<(), NotifyError> {
        info!(
            target_url = %alert.target_url,
            keyword = %alert.keyword,
            heading = %alert.heading,
            link = %alert.link,
            sentiment = %alert.sentiment_label,
            score = alert.sentiment_score,
            "{}",
            alert.subject()
        );
        Ok(())
    }
}
