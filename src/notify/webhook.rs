//! HTTP bridge notifier.

use std::time::Duration;

use futures::future::BoxFuture;

use super::{Notice, Notifier};
use crate::{DropError, Result};

/// Request timeout for webhook calls.
const WEBHOOK_TIMEOUT_SECS: u64 = 10;

/// Posts notices as JSON to a chat bridge.
///
/// The request carries `Authorization: Bearer <token>` so the bridge can
/// tell the service apart from other callers.
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
    token: String,
}

impl WebhookNotifier {
    /// Create a notifier posting to `url`.
    pub fn new(url: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(WEBHOOK_TIMEOUT_SECS))
            .build()
            .map_err(|e| DropError::Notify(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            url: url.into(),
            token: token.into(),
        })
    }

    /// Target URL.
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Notifier for WebhookNotifier {
    fn notify(&self, notice: Notice) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            let response = self
                .client
                .post(&self.url)
                .bearer_auth(&self.token)
                .json(&notice)
                .send()
                .await
                .map_err(|e| DropError::Notify(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                return Err(DropError::Notify(format!(
                    "bridge responded with {status}"
                )));
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let notifier = WebhookNotifier::new("http://127.0.0.1:9/notify", "secret").unwrap();
        assert_eq!(notifier.url(), "http://127.0.0.1:9/notify");
    }

    #[tokio::test]
    async fn test_unreachable_bridge_is_error() {
        // Port 9 (discard) is not expected to accept HTTP.
        let notifier = WebhookNotifier::new("http://127.0.0.1:9/notify", "secret").unwrap();
        let result = notifier
            .notify(Notice::upload_link("#main", "alice", "http://x"))
            .await;
        assert!(matches!(result, Err(DropError::Notify(_))));
    }
}
