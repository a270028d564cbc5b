// src/services/normalizer.rs

//! Visible-text extraction.
//!
//! Reduces an HTML body to the text a reader would see, in a canonical form
//! that can be compared for equality between fetches.

use std::collections::HashSet;

use scraper::{Html, Node};

use crate::models::NormalizerConfig;

/// Returns `true` when a text node under `parent` is rendered.
///
/// `ignored` holds lower-cased element names; `parent` is the name of the
/// text node's immediate parent element, `None` for text outside any element.
pub fn is_visible(ignored: &HashSet<String>, parent: Option<&str>) -> bool {
    match parent {
        Some(name) => !ignored.contains(&name.to_ascii_lowercase()),
        None => true,
    }
}

/// Converts raw HTML into normalized text.
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    ignored: HashSet<String>,
}

impl TextNormalizer {
    /// Create a normalizer ignoring the given element names.
    pub fn new<I, S>(ignore_elements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            ignored: ignore_elements
                .into_iter()
                .map(|name| name.as_ref().trim().to_ascii_lowercase())
                .collect(),
        }
    }

    pub fn from_config(config: &NormalizerConfig) -> Self {
        Self::new(&config.ignore_elements)
    }

    /// Extract visible text: trimmed non-empty text nodes in document order,
    /// joined by single spaces, lower-cased.
    ///
    /// Comments are never text nodes, so they drop out of the walk.
    pub fn normalize(&self, raw: &str) -> String {
        let document = Html::parse_document(raw);

        let fragments: Vec<&str> = document
            .tree
            .root()
            .descendants()
            .filter_map(|node| {
                let Node::Text(text) = node.value() else {
                    return None;
                };
                let parent = node
                    .parent()
                    .and_then(|p| p.value().as_element().map(|e| e.name()));
                if !is_visible(&self.ignored, parent) {
                    return None;
                }
                let trimmed = text.trim();
                (!trimmed.is_empty()).then_some(trimmed)
            })
            .collect();

        fragments.join(" ").to_lowercase()
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::from_config(&NormalizerConfig::default())
    }
}
