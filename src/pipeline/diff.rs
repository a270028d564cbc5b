//! Snapshot comparison.
//!
//! Compares a freshly normalized page against its baseline. Comparison is
//! always against the original capture, never the previous observation.

use crate::utils::fingerprint;

/// Outcome of comparing a current snapshot with a baseline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Comparison {
    /// Current text equals the baseline
    Unchanged,
    /// Current text differs from the baseline
    Changed {
        /// Character count of the new text
        length: usize,
        /// Short digest of the new text
        fingerprint: String,
    },
    /// Page produced no visible text; treated as "no data".
    ///
    /// A page whose visible text is really removed is therefore never
    /// reported, in exchange for not alerting on blank or half-loaded pages.
    Empty,
}

impl Comparison {
    /// Check if the snapshot counts as a change.
    pub fn is_change(&self) -> bool {
        matches!(self, Comparison::Changed { .. })
    }
}

/// Compare `current` with `baseline`.
pub fn compare(baseline: &str, current: &str) -> Comparison {
    if current.is_empty() {
        return Comparison::Empty;
    }
    if current == baseline {
        return Comparison::Unchanged;
    }
    Comparison::Changed {
        length: current.chars().count(),
        fingerprint: fingerprint(current),
    }
}
