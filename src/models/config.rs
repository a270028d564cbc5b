//! Application configuration structures.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// HTTP and scheduling behavior settings
    #[serde(default)]
    pub watcher: WatcherConfig,

    /// Webhook delivery settings
    #[serde(default)]
    pub notifier: NotifierConfig,

    /// Visible-text extraction settings
    #[serde(default)]
    pub normalizer: NormalizerConfig,

    /// Pages to watch, in scan order
    #[serde(default)]
    pub pages: Vec<PageEntry>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.watcher.user_agent.trim().is_empty() {
            return Err(AppError::validation("watcher.user_agent is empty"));
        }
        if self.watcher.timeout_secs == 0 {
            return Err(AppError::validation("watcher.timeout_secs must be > 0"));
        }
        if self.watcher.interval_secs == 0 {
            return Err(AppError::validation("watcher.interval_secs must be > 0"));
        }
        if self.watcher.max_concurrent == 0 {
            return Err(AppError::validation("watcher.max_concurrent must be > 0"));
        }
        if self.watcher.startup_attempts == 0 {
            return Err(AppError::validation(
                "watcher.startup_attempts must be > 0",
            ));
        }
        if self.notifier.webhook_url.trim().is_empty() {
            return Err(AppError::validation("notifier.webhook_url is empty"));
        }
        url::Url::parse(&self.notifier.webhook_url).map_err(|e| {
            AppError::validation(format!("notifier.webhook_url is not a URL: {e}"))
        })?;
        if self.pages.is_empty() {
            return Err(AppError::validation("No pages defined"));
        }

        let mut labels = HashSet::new();
        for page in &self.pages {
            if page.label.trim().is_empty() {
                return Err(AppError::validation(format!(
                    "Page with url {} has an empty label",
                    page.url
                )));
            }
            if !labels.insert(page.label.as_str()) {
                return Err(AppError::validation(format!(
                    "Duplicate page label '{}'",
                    page.label
                )));
            }
            url::Url::parse(&page.url).map_err(|e| {
                AppError::validation(format!("Page '{}' has an invalid url: {e}", page.label))
            })?;
        }
        Ok(())
    }
}

/// HTTP client and scan scheduling settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatcherConfig {
    /// User-Agent header for page requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Seconds to sleep between ticks
    #[serde(default = "defaults::interval")]
    pub interval_secs: u64,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Maximum concurrent page fetches within one tick
    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,

    /// Baseline capture attempts per page before startup is aborted
    #[serde(default = "defaults::startup_attempts")]
    pub startup_attempts: u32,

    /// Delay between baseline capture attempts
    #[serde(default = "defaults::startup_retry_delay")]
    pub startup_retry_delay_secs: u64,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            interval_secs: defaults::interval(),
            timeout_secs: defaults::timeout(),
            max_concurrent: defaults::max_concurrent(),
            startup_attempts: defaults::startup_attempts(),
            startup_retry_delay_secs: defaults::startup_retry_delay(),
        }
    }
}

/// Webhook settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifierConfig {
    /// Endpoint receiving `{"text": ...}` payloads
    #[serde(default)]
    pub webhook_url: String,

    /// Message sent by the `ping` command
    #[serde(default = "defaults::ready_message")]
    pub ready_message: String,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            webhook_url: String::new(),
            ready_message: defaults::ready_message(),
        }
    }
}

/// Visible-text extraction settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizerConfig {
    /// Element names whose direct text children are not rendered
    #[serde(default = "defaults::ignore_elements")]
    pub ignore_elements: Vec<String>,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            ignore_elements: defaults::ignore_elements(),
        }
    }
}

/// A page to watch as listed in the configuration file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageEntry {
    /// Short unique name used in logs and notifications
    pub label: String,

    /// Address to fetch
    pub url: String,
}

impl PageEntry {
    pub fn new(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            url: url.into(),
        }
    }
}

mod defaults {
    // Watcher defaults
    pub fn user_agent() -> String {
        concat!("pagewatch/", env!("CARGO_PKG_VERSION")).into()
    }
    pub fn interval() -> u64 {
        60
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn max_concurrent() -> usize {
        4
    }
    pub fn startup_attempts() -> u32 {
        3
    }
    pub fn startup_retry_delay() -> u64 {
        5
    }

    // Notifier defaults
    pub fn ready_message() -> String {
        "pagewatch is ready and working.".into()
    }

    // Normalizer defaults
    pub fn ignore_elements() -> Vec<String> {
        ["script", "style", "head", "title", "meta", "noscript", "template"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn valid_config() -> Config {
        Config {
            notifier: NotifierConfig {
                webhook_url: "https://hooks.example.com/services/T0/B0/X".to_string(),
                ..NotifierConfig::default()
            },
            pages: vec![
                PageEntry::new("RNZ", "https://www.rnz.co.nz/"),
                PageEntry::new("The Spinoff", "https://thespinoff.co.nz/"),
            ],
            ..Config::default()
        }
    }

    #[test]
    fn validate_valid_config_ok() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn validate_default_config_needs_webhook_and_pages() {
        assert!(Config::default().validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_user_agent() {
        let mut config = valid_config();
        config.watcher.user_agent = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_interval_and_concurrency() {
        let mut config = valid_config();
        config.watcher.interval_secs = 0;
        assert!(config.validate().is_err());

        let mut config = valid_config();
        config.watcher.max_concurrent = 0;
        assert!(config.validate().is_err());

        let mut config = valid_config();
        config.watcher.startup_attempts = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_duplicate_labels() {
        let mut config = valid_config();
        config
            .pages
            .push(PageEntry::new("RNZ", "https://www.rnz.co.nz/news"));
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("Duplicate page label 'RNZ'"));
    }

    #[test]
    fn validate_rejects_bad_urls() {
        let mut config = valid_config();
        config.pages[0].url = "not a url".to_string();
        assert!(config.validate().is_err());

        let mut config = valid_config();
        config.notifier.webhook_url = "hooks".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_from_toml_file_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[watcher]
user_agent = "Timely Terry/0.1"
interval_secs = 120

[notifier]
webhook_url = "https://hooks.example.com/services/T0/B0/X"

[[pages]]
label = "RNZ"
url = "https://www.rnz.co.nz/"
"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.watcher.user_agent, "Timely Terry/0.1");
        assert_eq!(config.watcher.interval_secs, 120);
        assert_eq!(config.watcher.timeout_secs, 30);
        assert_eq!(config.notifier.ready_message, "pagewatch is ready and working.");
        assert!(config.normalizer.ignore_elements.contains(&"script".to_string()));
        assert_eq!(config.pages, vec![PageEntry::new("RNZ", "https://www.rnz.co.nz/")]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, AppError::Io(_)));
    }
}
