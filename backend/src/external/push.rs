//! Push notification channel client
//!
//! Fire-and-forget delivery to the mobile push channel. Delivery failures are
//! logged and never propagated into the workflow that triggered them.

use serde::Serialize;

use crate::config::PushConfig;

/// Client for the push notification channel
#[derive(Clone)]
pub struct PushClient {
    endpoint: String,
    token: String,
    http_client: reqwest::Client,
}

/// Payload sent to the push channel
#[derive(Debug, Serialize)]
struct PushMessage<'a> {
    title: &'a str,
    body: &'a str,
    entity_type: &'a str,
    entity_id: String,
}

impl PushClient {
    pub fn new(config: &PushConfig) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            token: config.token.clone(),
            http_client: reqwest::Client::new(),
        }
    }

    /// Whether a push endpoint is configured at all
    pub fn is_enabled(&self) -> bool {
        !self.endpoint.is_empty()
    }

    /// Send a push message without waiting for the caller's request to care
    /// about the outcome. Failures are logged at warn level.
    pub async fn send(&self, title: &str, body: &str, entity_type: &str, entity_id: uuid::Uuid) {
        if !self.is_enabled() {
            tracing::debug!("Push channel disabled, skipping message: {}", title);
            return;
        }

        let message = PushMessage {
            title,
            body,
            entity_type,
            entity_id: entity_id.to_string(),
        };

        let result = self
            .http_client
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .json(&message)
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => {
                tracing::debug!("Push message delivered: {}", title);
            }
            Ok(response) => {
                tracing::warn!(
                    "Push channel returned status {} for message: {}",
                    response.status(),
                    title
                );
            }
            Err(e) => {
                tracing::warn!("Push delivery failed for message {}: {}", title, e);
            }
        }
    }
}
