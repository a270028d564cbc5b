// src/services/notifier.rs

//! Webhook notifier.

use async_trait::async_trait;
use reqwest::Client;

use crate::error::Result;
use crate::models::{DeliveryOutcome, Notification, WatcherConfig};
use crate::utils::http;

/// Delivers text messages to an external endpoint.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Post `notification` to `endpoint` once and report the outcome.
    async fn notify(&self, endpoint: &str, notification: &Notification) -> DeliveryOutcome;
}

/// Notifier posting `{"text": ...}` JSON to a Slack-style webhook.
#[derive(Clone)]
pub struct WebhookNotifier {
    client: Client,
}

impl WebhookNotifier {
    pub fn new(config: &WatcherConfig) -> Result<Self> {
        Ok(Self {
            client: http::create_async_client(config)?,
        })
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, endpoint: &str, notification: &Notification) -> DeliveryOutcome {
        // `.json()` sets `Content-Type: application/json`
        let response = self.client.post(endpoint).json(notification).send().await;

        match response {
            Ok(resp) => {
                let outcome = DeliveryOutcome::from_status(resp.status().as_u16());
                if outcome.delivered {
                    log::info!("Webhook accepted the message ({})", resp.status());
                } else {
                    log::warn!("Webhook rejected the message ({})", resp.status());
                }
                outcome
            }
            Err(e) => {
                log::warn!("Could not reach webhook: {}", redacted(e));
                DeliveryOutcome::transport_failure()
            }
        }
    }
}

/// Describe a request error without the endpoint, which embeds the
/// webhook's credentials.
fn redacted(err: reqwest::Error) -> String {
    err.without_url().to_string()
}
