// src/services/fetcher.rs

//! Page fetcher.
//!
//! Issues a single GET per call and classifies every failure. Retrying is the
//! scan loop's business, not this layer's.

use std::result::Result as StdResult;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, header::USER_AGENT};

use crate::error::{FetchFailure, Result};
use crate::models::WatcherConfig;
use crate::utils::http;

/// Source of raw page bodies.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch `url` identifying as `user_agent`.
    async fn fetch(&self, url: &str, user_agent: &str) -> StdResult<String, FetchFailure>;
}

/// Fetcher backed by a reqwest client.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Build a fetcher with the configured request timeout.
    pub fn new(config: &WatcherConfig) -> Result<Self> {
        Ok(Self {
            client: http::create_async_client(config)?,
        })
    }

    async fn get(&self, url: &str, user_agent: &str) -> StdResult<String, FetchFailure> {
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, user_agent)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchFailure::BadStatus(status.as_u16()));
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str, user_agent: &str) -> StdResult<String, FetchFailure> {
        log::debug!("GET {}", url);
        let result = self.get(url, user_agent).await;

        match &result {
            Ok(body) => log::debug!("Fetched {} ({} bytes)", url, body.len()),
            Err(FetchFailure::BadStatus(code)) => {
                log::warn!("Got {} response from: {}", code, url)
            }
            Err(FetchFailure::Transport(details)) => {
                log::warn!("Unable to retrieve {}: {}", url, details)
            }
        }

        result
    }
}
