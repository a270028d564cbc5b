// src/error.rs

//! Unified error handling for the watcher.

use std::fmt;

use thiserror::Error;

/// Result type alias for watcher operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client could not be built or a request failed outright
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Registry misuse (duplicate label, unknown label, double mark)
    #[error("Registry error: {0}")]
    Registry(String),

    /// Baseline capture failed for a page at startup
    #[error("Could not register '{label}': {message}")]
    Registration { label: String, message: String },
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a registry error.
    pub fn registry(message: impl Into<String>) -> Self {
        Self::Registry(message.into())
    }

    /// Create a registration error for a page label.
    pub fn registration(label: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Registration {
            label: label.into(),
            message: message.to_string(),
        }
    }
}

/// Classified failure of a single page fetch.
///
/// The underlying transport error is never propagated, only its description.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    /// Connection, DNS, timeout or body read failure
    #[error("transport failure: {0}")]
    Transport(String),

    /// Response arrived with a status other than 200
    #[error("unexpected status {0}")]
    BadStatus(u16),
}

impl From<reqwest::Error> for FetchFailure {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}
