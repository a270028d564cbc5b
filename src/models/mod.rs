// src/models/mod.rs

//! Domain models for the watcher.
//!
//! This module contains the data structures shared by the services and the
//! scan pipeline, organized by their primary purpose.

mod config;
mod notification;
mod page;

// Re-export all public types
pub use config::{Config, NormalizerConfig, NotifierConfig, PageEntry, WatcherConfig};
pub use notification::{DeliveryOutcome, Notification};
pub use page::WatchedPage;
