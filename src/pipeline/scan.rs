// src/pipeline/scan.rs

//! Scan loop.
//!
//! Drives fetch, normalize, compare, notify and mark for every page that is
//! still being watched, one tick at a time, until every page has had its
//! change notification delivered.

use std::result::Result as StdResult;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};

use crate::error::{AppError, FetchFailure, Result};
use crate::models::{Config, Notification};
use crate::pipeline::diff::{Comparison, compare};
use crate::pipeline::registry::WatchRegistry;
use crate::services::{Fetcher, Notifier, TextNormalizer};

/// Counters for a single pass over the pending pages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Pages fetched this tick
    pub checked: usize,
    /// Pages equal to their baseline
    pub unchanged: usize,
    /// Pages with no usable data (fetch failure or empty text)
    pub skipped: usize,
    /// Pages that differ from their baseline
    pub detected: usize,
    /// Change notifications accepted by the webhook
    pub delivered: usize,
    /// Change notifications that will be retried next tick
    pub undelivered: usize,
}

/// When a page was registered and when its change was delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTimeline {
    pub label: String,
    pub registered_at: DateTime<Utc>,
    pub changed_at: Option<DateTime<Utc>>,
}

/// Summary of a completed watch run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub ticks: u64,
    pub changed: usize,
    pub total: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Per-page timeline, in registration order
    pub pages: Vec<PageTimeline>,
}

/// Owner of the registry and driver of the watch lifecycle.
pub struct ScanLoop {
    config: Arc<Config>,
    fetcher: Arc<dyn Fetcher>,
    notifier: Arc<dyn Notifier>,
    normalizer: TextNormalizer,
    registry: WatchRegistry,
    ticks: u64,
}

impl ScanLoop {
    pub fn new(config: Arc<Config>, fetcher: Arc<dyn Fetcher>, notifier: Arc<dyn Notifier>) -> Self {
        let normalizer = TextNormalizer::from_config(&config.normalizer);
        Self {
            config,
            fetcher,
            notifier,
            normalizer,
            registry: WatchRegistry::new(),
            ticks: 0,
        }
    }

    pub fn registry(&self) -> &WatchRegistry {
        &self.registry
    }

    /// Ticks executed so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Register every configured page, in configuration order.
    ///
    /// Each baseline capture gets `startup_attempts` tries. If a page still
    /// has no baseline after that, startup is aborted with the last error.
    pub async fn register_all(&mut self) -> Result<()> {
        let config = Arc::clone(&self.config);
        for entry in &config.pages {
            self.register_with_retry(&entry.label, &entry.url).await?;
        }
        log::info!("Watching {} pages", self.registry.total_count());
        Ok(())
    }

    async fn register_with_retry(&mut self, label: &str, url: &str) -> Result<()> {
        let attempts = self.config.watcher.startup_attempts.max(1);
        let delay = Duration::from_secs(self.config.watcher.startup_retry_delay_secs);
        let mut attempt = 1;

        loop {
            let result = self
                .registry
                .register(
                    self.fetcher.as_ref(),
                    &self.normalizer,
                    label,
                    url,
                    &self.config.watcher.user_agent,
                )
                .await;

            match result {
                Err(e @ AppError::Registration { .. }) if attempt < attempts => {
                    log::warn!(
                        "Baseline attempt {}/{} for '{}' failed: {}",
                        attempt,
                        attempts,
                        label,
                        e
                    );
                    attempt += 1;
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    log::error!("Giving up on '{}' after {} attempt(s)", label, attempt);
                    return Err(e);
                }
                Ok(()) => return Ok(()),
            }
        }
    }

    /// Run one pass over the pages that have not changed yet.
    ///
    /// Fetches may overlap (bounded by `max_concurrent`), but all of them
    /// complete before any page is compared, and registry updates happen
    /// one page at a time in registration order.
    pub async fn tick(&mut self) -> TickReport {
        self.ticks += 1;
        let config = Arc::clone(&self.config);
        let user_agent = config.watcher.user_agent.as_str();
        let concurrency = config.watcher.max_concurrent.max(1);

        let targets: Vec<(String, String)> = self
            .registry
            .pending()
            .map(|page| (page.label().to_string(), page.url().to_string()))
            .collect();

        let fetcher = &self.fetcher;
        let fetched: Vec<(String, String, StdResult<String, FetchFailure>)> =
            stream::iter(targets)
                .map(|(label, url)| async move {
                    let result = fetcher.fetch(&url, user_agent).await;
                    (label, url, result)
                })
                .buffered(concurrency)
                .collect()
                .await;

        let mut report = TickReport::default();
        for (label, url, result) in fetched {
            report.checked += 1;

            let body = match result {
                Ok(body) => body,
                Err(failure) => {
                    log::warn!("'{}' skipped this tick: {}", label, failure);
                    report.skipped += 1;
                    continue;
                }
            };

            let current = self.normalizer.normalize(&body);
            let comparison = match self.registry.get(&label) {
                Some(page) => compare(page.baseline(), &current),
                None => continue,
            };

            match comparison {
                Comparison::Empty => {
                    log::warn!("'{}' returned no visible text, skipping", label);
                    report.skipped += 1;
                }
                Comparison::Unchanged => {
                    log::info!("'{}' no update.", label);
                    report.unchanged += 1;
                }
                Comparison::Changed { length, fingerprint } => {
                    log::info!("'{}' updated!", label);
                    log::info!("    New content has {} characters ({})", length, fingerprint);
                    report.detected += 1;

                    if self.deliver(&label, &url, &config.notifier.webhook_url).await {
                        report.delivered += 1;
                    } else {
                        report.undelivered += 1;
                    }
                }
            }
        }

        report
    }

    /// Notify about a change and, on delivery, mark the page as changed.
    async fn deliver(&mut self, label: &str, url: &str, endpoint: &str) -> bool {
        let notification = Notification::change(label, url);
        let outcome = self.notifier.notify(endpoint, &notification).await;

        if !outcome.delivered {
            log::warn!(
                "Could not notify about '{}' (status {:?}), will try again next tick",
                label,
                outcome.status_code
            );
            return false;
        }

        if let Err(e) = self.registry.mark_changed(label) {
            log::error!("{}", e);
            return false;
        }
        if let Some(page) = self.registry.get(label) {
            let watched = page
                .changed_at()
                .map(|at| at - page.registered_at())
                .unwrap_or_else(chrono::Duration::zero);
            log::info!(
                "    Marked '{}' as changed after {}s of watching",
                label,
                watched.num_seconds()
            );
        }
        true
    }

    /// Tick until every page has changed, sleeping `interval_secs` between
    /// ticks.
    pub async fn run(&mut self) -> RunSummary {
        let started_at = Utc::now();
        let interval = Duration::from_secs(self.config.watcher.interval_secs);
        let first_tick = self.ticks;

        while !self.registry.all_changed() {
            let report = self.tick().await;
            log::debug!("Tick {} report: {:?}", self.ticks, report);
            log::info!(
                "Detected {}/{} page changes to date.",
                self.registry.count_changed(),
                self.registry.total_count()
            );

            if self.registry.all_changed() {
                break;
            }
            tokio::time::sleep(interval).await;
        }

        log::info!("All pages have changed. Knocking off work.");
        RunSummary {
            ticks: self.ticks - first_tick,
            changed: self.registry.count_changed(),
            total: self.registry.total_count(),
            started_at,
            finished_at: Utc::now(),
            pages: self
                .registry
                .pages()
                .map(|page| PageTimeline {
                    label: page.label().to_string(),
                    registered_at: page.registered_at(),
                    changed_at: page.changed_at(),
                })
                .collect(),
        }
    }
}
