// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use crate::error::Result;
use crate::models::WatcherConfig;

/// Create a configured asynchronous HTTP client.
///
/// The User-Agent is not baked in here; page fetches set it per request and
/// webhook posts go out with reqwest's default.
pub fn create_async_client(config: &WatcherConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}
