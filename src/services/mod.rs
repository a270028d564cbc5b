//! Service layer for the watcher.
//!
//! This module contains the per-page building blocks:
//! - Page fetching (`Fetcher`, `HttpFetcher`)
//! - Visible-text extraction (`TextNormalizer`)
//! - Webhook delivery (`Notifier`, `WebhookNotifier`)

mod fetcher;
mod normalizer;
mod notifier;

#[cfg(test)]
pub(crate) mod mock;

pub use fetcher::{Fetcher, HttpFetcher};
pub use normalizer::{TextNormalizer, is_visible};
pub use notifier::{Notifier, WebhookNotifier};
