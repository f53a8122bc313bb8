//! HTTP fetch client
//!
//! This module handles all HTTP requests for the extraction pipeline:
//! - Building a reqwest client with the configured timeout and user agent
//! - The root-reachability gate that precedes any extraction work
//! - Text fetches with bounded retry on transport-level failures
//!
//! The retry split matters: transport failures (DNS, connection refused,
//! timeout) are retried because they are often transient; HTTP error
//! statuses are returned as-is so a real 404/403 signal is never masked
//! by a retry loop.

use crate::config::FetchConfig;
use crate::fetch::normalize_url;
use crate::{Result, ShopscopeError};
use reqwest::{Client, Response};
use std::time::Duration;

/// Per-extraction HTTP client
///
/// One `FetchClient` is scoped to exactly one extraction invocation; the
/// underlying connection pool is released when it is dropped.
#[derive(Debug, Clone)]
pub struct FetchClient {
    client: Client,
    retries: u32,
}

impl FetchClient {
    /// Builds a client from the fetch configuration
    ///
    /// Redirects are followed transparently (reqwest's default policy);
    /// compressed responses are decoded in-flight.
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self {
            client,
            retries: config.retries,
        })
    }

    /// Normalizes the URL and confirms the site root answers
    ///
    /// Issues exactly one GET. A transport failure or a response status
    /// of 400 or above means the site is not usable and the whole
    /// pipeline must not run; both surface as
    /// [`ShopscopeError::UnreachableSite`].
    ///
    /// On success returns the normalized, confirmed-reachable root URL.
    pub async fn ensure_root_reachable(&self, url: &str) -> Result<String> {
        let root = normalize_url(url);
        // Normalization is permissive; reject inputs that still do not
        // form a real URL before handing them to reqwest
        url::Url::parse(&root)?;
        let response = self.client.get(&root).send().await.map_err(|e| {
            ShopscopeError::UnreachableSite {
                url: root.clone(),
                reason: e.to_string(),
            }
        })?;

        let status = response.status();
        if status.as_u16() >= 400 {
            return Err(ShopscopeError::UnreachableSite {
                url: root,
                reason: format!("root status {}", status.as_u16()),
            });
        }

        tracing::debug!("Root reachable: {} ({})", root, status);
        Ok(root)
    }

    /// Issues a GET, retrying transport-level failures only
    ///
    /// HTTP error statuses are terminal: the response is returned on the
    /// first attempt that produces one. Returns `None` only when every
    /// attempt (1 + `retries`) failed at the transport level.
    async fn get(&self, url: &str) -> Option<Response> {
        for attempt in 0..=self.retries {
            match self.client.get(url).send().await {
                Ok(response) => return Some(response),
                Err(e) => {
                    tracing::debug!(
                        "Transport failure for {} (attempt {}/{}): {}",
                        url,
                        attempt + 1,
                        self.retries + 1,
                        e
                    );
                }
            }
        }
        None
    }

    /// Fetches a URL and returns `(status, body)`
    ///
    /// The body is present only when the response declares a textual or
    /// JSON content type; binary responses yield `(status, None)` even
    /// on success. A total transport failure yields `(0, None)`.
    pub async fn fetch_text(&self, url: &str) -> (u16, Option<String>) {
        let Some(response) = self.get(url).await else {
            return (0, None);
        };

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        if !(content_type.contains("text") || content_type.contains("json")) {
            tracing::debug!("Skipping non-text body from {} ({})", url, content_type);
            return (status, None);
        }

        match response.text().await {
            Ok(body) => (status, Some(body)),
            Err(e) => {
                tracing::debug!("Failed to read body from {}: {}", url, e);
                (status, None)
            }
        }
    }
}
