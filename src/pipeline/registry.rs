// src/pipeline/registry.rs

//! Watch registry.
//!
//! Typed mapping from label to [`WatchedPage`], kept in registration order.
//! The scan loop owns the registry outright, so there is no locking here.

use std::collections::HashMap;

use crate::error::{AppError, Result};
use crate::models::WatchedPage;
use crate::services::{Fetcher, TextNormalizer};
use crate::utils::fingerprint;

/// All watched pages, keyed by label.
#[derive(Debug, Default)]
pub struct WatchRegistry {
    pages: Vec<WatchedPage>,
    index: HashMap<String, usize>,
}

impl WatchRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture a baseline for `url` and start watching it under `label`.
    ///
    /// Makes a single fetch attempt; a failed fetch registers nothing.
    pub async fn register(
        &mut self,
        fetcher: &dyn Fetcher,
        normalizer: &TextNormalizer,
        label: &str,
        url: &str,
        user_agent: &str,
    ) -> Result<()> {
        if self.index.contains_key(label) {
            return Err(AppError::registry(format!(
                "label '{label}' is already registered"
            )));
        }

        let raw = fetcher
            .fetch(url, user_agent)
            .await
            .map_err(|failure| AppError::registration(label, failure))?;
        let baseline = normalizer.normalize(&raw);

        log::info!(
            "'{}' reference page has {} characters ({})",
            label,
            baseline.chars().count(),
            fingerprint(&baseline)
        );

        self.index.insert(label.to_string(), self.pages.len());
        self.pages.push(WatchedPage::new(label, url, baseline));
        Ok(())
    }

    /// Number of pages whose change notification was delivered.
    pub fn count_changed(&self) -> usize {
        self.pages.iter().filter(|p| p.has_changed()).count()
    }

    pub fn total_count(&self) -> usize {
        self.pages.len()
    }

    /// True once every registered page has changed.
    pub fn all_changed(&self) -> bool {
        self.count_changed() == self.total_count()
    }

    /// Transition a page from watching to changed.
    ///
    /// Errors for unknown labels and for pages that are already changed.
    pub fn mark_changed(&mut self, label: &str) -> Result<()> {
        let idx = *self
            .index
            .get(label)
            .ok_or_else(|| AppError::registry(format!("unknown label '{label}'")))?;

        if !self.pages[idx].mark_changed() {
            return Err(AppError::registry(format!(
                "'{label}' is already marked as changed"
            )));
        }
        Ok(())
    }

    pub fn get(&self, label: &str) -> Option<&WatchedPage> {
        self.index.get(label).map(|&idx| &self.pages[idx])
    }

    /// All pages in registration order.
    pub fn pages(&self) -> impl Iterator<Item = &WatchedPage> {
        self.pages.iter()
    }

    /// Pages still being watched, in registration order.
    pub fn pending(&self) -> impl Iterator<Item = &WatchedPage> {
        self.pages.iter().filter(|p| !p.has_changed())
    }
}
