//! HTTP client for fetching listing pages and geocode responses
//!
//! Thin wrapper over reqwest with per-client timeout, user agent and an
//! optional referer. Both external collaborators go through this seam: the
//! duty-roster portal (HTML) and the geocoding service (JSON).

use anyhow::{anyhow, Result};
use reqwest::{header, Client, ClientBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use crate::infrastructure::error::ScrapeError;

/// Configuration for HTTP client behavior
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User agent string
    pub user_agent: String,
    /// Referer header, sent when present
    pub referer: Option<String>,
}

/// HTTP client with fixed headers and timeout
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
}

impl HttpClient {
    /// Create a new HTTP client with the given configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(&config.user_agent)
            .cookie_store(true)
            .gzip(true)
            .build()
            .map_err(|e| anyhow!("Failed to create HTTP client: {}", e))?;

        Ok(Self { client, config })
    }

    /// Issue a GET request with query parameters
    pub async fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<Response, ScrapeError> {
        debug!("HTTP GET: {} {:?}", url, query);

        let mut request = self.client.get(url).query(query);
        if let Some(referer) = &self.config.referer {
            request = request.header(header::REFERER, referer);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ScrapeError::request_failed(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response)
    }

    /// Fetch a text document.
    ///
    /// The body is decoded honoring the charset the server declares;
    /// undecodable bytes are replaced instead of failing the request, which
    /// keeps partially broken portal pages usable.
    pub async fn fetch_text(&self, url: &str, query: &[(&str, &str)]) -> Result<String, ScrapeError> {
        let response = self.get(url, query).await?;

        let text = response
            .text()
            .await
            .map_err(|e| ScrapeError::invalid_body(url, e))?;

        if text.is_empty() {
            return Err(ScrapeError::EmptyResponse {
                url: url.to_string(),
            });
        }

        Ok(text)
    }

    /// Fetch and deserialize a JSON document
    pub async fn fetch_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ScrapeError> {
        let response = self.get(url, query).await?;

        response
            .json::<T>()
            .await
            .map_err(|e| ScrapeError::invalid_body(url, e))
    }
}
