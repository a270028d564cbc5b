//! Pipeline entry points for the watcher.
//!
//! - `run_watcher`: Capture baselines, then scan until every page changed
//! - `send_ping`: Post the ready message to verify the webhook

pub mod diff;
pub mod registry;
pub mod scan;

use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::{Config, Notification};
use crate::services::{HttpFetcher, Notifier, WebhookNotifier};

pub use diff::{Comparison, compare};
pub use registry::WatchRegistry;
pub use scan::{PageTimeline, RunSummary, ScanLoop, TickReport};

/// Run a full watch against live HTTP endpoints.
pub async fn run_watcher(config: Arc<Config>) -> Result<RunSummary> {
    let fetcher = Arc::new(HttpFetcher::new(&config.watcher)?);
    let notifier = Arc::new(WebhookNotifier::new(&config.watcher)?);

    let mut scan = ScanLoop::new(Arc::clone(&config), fetcher, notifier);
    scan.register_all().await?;
    Ok(scan.run().await)
}

/// Send a test message through the webhook.
pub async fn send_ping(config: &Config, message: Option<&str>) -> Result<()> {
    let notifier = WebhookNotifier::new(&config.watcher)?;
    let text = message.unwrap_or(&config.notifier.ready_message);

    let outcome = notifier
        .notify(&config.notifier.webhook_url, &Notification::new(text))
        .await;
    log::info!("Sent a test message. Received {:?} status.", outcome.status_code);

    if outcome.delivered {
        Ok(())
    } else {
        Err(AppError::config(format!(
            "webhook did not accept the test message (status {:?})",
            outcome.status_code
        )))
    }
}
