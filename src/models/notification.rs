//! Webhook message and delivery result.

use serde::Serialize;

/// A single text message for the webhook.
///
/// Serializes to the `{"text": "..."}` payload Slack-style webhooks expect.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Notification {
    pub text: String,
}

impl Notification {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Message announcing a detected change on a page.
    pub fn change(label: &str, url: &str) -> Self {
        Self::new(format!("I found a change on '{label}'. Visit: {url}"))
    }
}

/// Result of posting a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryOutcome {
    /// True iff the endpoint answered 200
    pub delivered: bool,

    /// Response status, `None` when no response arrived
    pub status_code: Option<u16>,
}

impl DeliveryOutcome {
    /// Outcome for a response with the given status.
    pub fn from_status(status: u16) -> Self {
        Self {
            delivered: status == 200,
            status_code: Some(status),
        }
    }

    /// Outcome for a request that never got a response.
    pub fn transport_failure() -> Self {
        Self {
            delivered: false,
            status_code: None,
        }
    }
}
