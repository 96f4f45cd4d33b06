use reqwest::header::CONTENT_TYPE;
use reqwest::Client;

use super::message::Message;
use crate::error::NotifyError;

/// Posts [`Message`]s to one incoming-webhook URL.
#[derive(Debug, Clone)]
pub struct SlackClient {
    url: String,
    client: Client,
}

impl SlackClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: Client::new(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Sends each message in order and stops at the first failure.
    ///
    /// A status >= 400 becomes [`NotifyError::Delivery`] carrying the response
    /// body; messages after a failed one are not sent. An empty slice is a no-op.
    pub async fn send(&self, messages: &[Message]) -> Result<(), NotifyError> {
        for (idx, message) in messages.iter().enumerate() {
            let body = serde_json::to_vec(message)?;

            let resp = self
                .client
                .post(&self.url)
                .header(CONTENT_TYPE, "application/json")
                .body(body)
                .send()
                .await
                .map_err(NotifyError::Transport)?;

            let status = resp.status();
            if status.as_u16() >= 400 {
                let reason = match resp.text().await {
                    Ok(body) if !body.is_empty() => body,
                    _ => status.canonical_reason().unwrap_or_default().to_string(),
                };
                tracing::debug!(
                    target: "slacklog::slack",
                    status = status.as_u16(),
                    reason = %reason,
                    "slack rejected message {}/{}",
                    idx + 1,
                    messages.len()
                );
                return Err(NotifyError::Delivery {
                    code: status.as_u16(),
                    reason,
                });
            }

            tracing::debug!(
                target: "slacklog::slack",
                status = status.as_u16(),
                "slack message {}/{} delivered",
                idx + 1,
                messages.len()
            );
        }

        Ok(())
    }
}
