use super::{Alert, Notifier};
use crate::error::NotifyError;
use crate::utils::truncate_for_log;
use reqwest::Client;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Posts alerts as JSON to an HTTP endpoint.
///
/// The payload carries a ready-to-send email (`from`, `to`, `subject`,
/// `html`, `text`) plus the raw alert fields, so the same hook works for a
/// mail relay or a chat integration.
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    url: String,
    from: String,
    to: String,
    http: Client,
}

impl WebhookNotifier {
    pub fn new(
        url: String,
        from: String,
        to: String,
        timeout: Duration,
    ) -> Result<Self, NotifyError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { url, from, to, http })
    }

    fn payload(&self, alert: &Alert) -> Value {
        json!({
            "from": self.from,
            "to": self.to,
            "subject": alert.subject(),
            "html": alert.html_body(),
            "text": alert.text_body(),
            "target_url": alert.target_url,
            "keyword": alert.keyword,
            "heading": alert.heading,
            "link": alert.link,
            "sentiment": {
                "label": alert.sentiment_label,
                "score": alert.sentiment_score,
            },
        })
    }
}

impl Notifier for WebhookNotifier {
    #[instrument(level = "debug", skip_all, fields(url = %self.url, link = %alert.link))]
    async fn send(&self, alert: &Alert) -> Result<(), NotifyError> {
        let resp = self
            .http
            .post(&self.url)
            .json(&self.payload(alert))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(
                status = %status,
                body = %truncate_for_log(&body, 300),
                "Webhook returned non-success"
            );
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                body: truncate_for_log(&body, 300),
            });
        }

        debug!(status = %status, "Alert delivered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SentimentLabel;

    fn notifier(url: &str) -> WebhookNotifier {
        WebhookNotifier::new(
            url.to_string(),
            "Perseus Alerts <alerts@example.com>".to_string(),
            "me@example.com".to_string(),
            Duration::from_secs(2),
        )
        .unwrap()
    }

    fn alert() -> Alert {
        Alert {
            target_url: "https://example.com".into(),
            keyword: "launch".into(),
            heading: "Launch day".into(),
            link: "https://example.com/posts/1".into(),
            sentiment_label: SentimentLabel::Neutral,
            sentiment_score: 0,
        }
    }

    #[test]
    fn test_payload_shape() {
        let payload = notifier("https://relay.example.com/send").payload(&alert());
        assert_eq!(payload["to"], "me@example.com");
        assert_eq!(
            payload["subject"],
            "Keyword Alert: \"launch\" found on https://example.com"
        );
        assert_eq!(payload["link"], "https://example.com/posts/1");
        assert_eq!(payload["sentiment"]["label"], "neutral");
        assert_eq!(payload["sentiment"]["score"], 0);
        assert!(payload["html"].as_str().unwrap().contains("<h2>Launch day</h2>"));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_error() {
        let err = notifier("http://127.0.0.1:9/hook").send(&alert()).await.unwrap_err();
        assert!(matches!(err, NotifyError::Transport(_)));
    }
}
