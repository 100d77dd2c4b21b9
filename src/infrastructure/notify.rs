use crate::domain::notification::Notification;
use crate::domain::ports::Notifier;
use crate::error::{Result, TipError};
use async_trait::async_trait;
use std::time::Duration;
use tracing::info;

/// Writes notifications to the log instead of delivering them.
#[derive(Default, Clone)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, notification: &Notification) -> Result<()> {
        info!(
            to = %notification.to,
            subject = %notification.subject,
            "notification (log only)"
        );
        Ok(())
    }
}

/// Posts the rendered notification as JSON to a webhook (e.g. a mail relay).
#[derive(Clone)]
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| TipError::Notification(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, notification: &Notification) -> Result<()> {
        self.client
            .post(&self.url)
            .json(notification)
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(|e| TipError::Notification(format!("webhook delivery failed: {e}")))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notification() -> Notification {
        Notification {
            to: "alice@example.com".to_string(),
            subject: "You received a 5.00 USDC tip!".to_string(),
            body: "Hi Alice".to_string(),
        }
    }

    #[tokio::test]
    async fn test_log_notifier_always_succeeds() {
        assert!(LogNotifier.notify(&notification()).await.is_ok());
    }

    #[tokio::test]
    async fn test_webhook_notifier_posts_json() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/notify")
            .match_body(mockito::Matcher::PartialJsonString(
                r#"{"to":"alice@example.com"}"#.to_string(),
            ))
            .with_status(202)
            .create_async()
            .await;

        let notifier = WebhookNotifier::new(format!("{}/notify", server.url())).unwrap();
        notifier.notify(&notification()).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_webhook_notifier_reports_rejection() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/notify")
            .with_status(500)
            .create_async()
            .await;

        let notifier = WebhookNotifier::new(format!("{}/notify", server.url())).unwrap();
        assert!(matches!(
            notifier.notify(&notification()).await,
            Err(TipError::Notification(_))
        ));
    }
}
