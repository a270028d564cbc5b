//! Watched page record.

use chrono::{DateTime, Utc};

/// One monitored page and its change state.
///
/// The baseline is fixed at registration; the only mutation is the one-way
/// transition to changed.
#[derive(Debug, Clone)]
pub struct WatchedPage {
    label: String,
    url: String,
    baseline: String,
    has_changed: bool,
    registered_at: DateTime<Utc>,
    changed_at: Option<DateTime<Utc>>,
}

impl WatchedPage {
    /// Create a watching page from a captured baseline.
    pub fn new(label: impl Into<String>, url: impl Into<String>, baseline: String) -> Self {
        Self {
            label: label.into(),
            url: url.into(),
            baseline,
            has_changed: false,
            registered_at: Utc::now(),
            changed_at: None,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Normalized text captured at registration.
    pub fn baseline(&self) -> &str {
        &self.baseline
    }

    pub fn has_changed(&self) -> bool {
        self.has_changed
    }

    pub fn registered_at(&self) -> DateTime<Utc> {
        self.registered_at
    }

    pub fn changed_at(&self) -> Option<DateTime<Utc>> {
        self.changed_at
    }

    /// Flip to changed. Returns `false` if the page was already changed.
    pub(crate) fn mark_changed(&mut self) -> bool {
        if self.has_changed {
            return false;
        }
        self.has_changed = true;
        self.changed_at = Some(Utc::now());
        true
    }
}
