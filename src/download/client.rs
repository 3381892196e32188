//! HTTP client wrapper for streaming media payloads.
//!
//! This module provides the `HttpClient` struct which opens remote media
//! files as byte streams with proper timeout configuration and error
//! handling. Writing the bytes to disk is the cache's job.

use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use reqwest::header::CONTENT_LENGTH;
use tracing::{debug, instrument};
use url::Url;

use super::constants::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS};
use super::error::DownloadError;
use super::fetcher::{MediaFetcher, MediaStream};
use crate::user_agent;

/// HTTP client for streaming media downloads.
///
/// This client is designed to be created once and reused for multiple
/// downloads, taking advantage of connection pooling.
///
/// # Example
///
/// ```no_run
/// use mediacache_core::download::{HttpClient, MediaFetcher};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = HttpClient::new();
/// let stream = client.open("https://example.com/video.mp4").await?;
/// println!("expected bytes: {:?}", stream.expected_bytes);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient {
    /// Creates a new HTTP client with default timeouts.
    ///
    /// Default configuration:
    /// - Connect timeout: 30 seconds
    /// - Read timeout: 5 minutes (for large files)
    /// - Gzip decompression: enabled
    #[must_use]
    pub fn new() -> Self {
        Self::new_with_timeouts(CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS)
    }

    /// Creates a new HTTP client with explicit timeout values.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the supplied
    /// timeout configuration.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new_with_timeouts(connect_timeout_secs: u64, read_timeout_secs: u64) -> Self {
        let client = build_client(connect_timeout_secs, read_timeout_secs)
            .expect("failed to build HTTP client with static configuration");
        Self { client }
    }

    /// Sends the GET request and maps failure statuses onto [`DownloadError`].
    async fn send_request(&self, url: &str) -> Result<reqwest::Response, DownloadError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                DownloadError::timeout(url)
            } else {
                DownloadError::network(url, e)
            }
        })?;

        if !response.status().is_success() {
            let status_code = response.status().as_u16();

            if matches!(status_code, 401 | 403 | 407) {
                let domain = Url::parse(url)
                    .ok()
                    .and_then(|u| u.host_str().map(std::string::ToString::to_string))
                    .unwrap_or_else(|| url.to_string());
                return Err(DownloadError::auth_required(url, status_code, domain));
            }

            return Err(DownloadError::http_status(url, status_code));
        }

        Ok(response)
    }

    /// Returns a reference to the underlying reqwest client.
    #[must_use]
    pub fn inner(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl MediaFetcher for HttpClient {
    #[instrument(skip(self), fields(url = %url))]
    async fn open(&self, url: &str) -> Result<MediaStream, DownloadError> {
        debug!("opening media stream");

        let parsed = Url::parse(url).map_err(|_| DownloadError::invalid_url(url))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(DownloadError::invalid_url(url));
        }

        let response = self.send_request(url).await?;
        let expected_bytes = content_length(&response);
        debug!(expected_bytes = ?expected_bytes, "media stream opened");

        let owned_url = url.to_string();
        let chunks = response
            .bytes_stream()
            .map(move |chunk| {
                chunk.map_err(|e| {
                    if e.is_timeout() {
                        DownloadError::timeout(owned_url.clone())
                    } else {
                        DownloadError::network(owned_url.clone(), e)
                    }
                })
            })
            .boxed();

        Ok(MediaStream::new(expected_bytes, chunks))
    }
}

fn build_client(connect_timeout_secs: u64, read_timeout_secs: u64) -> Result<Client, reqwest::Error> {
    Client::builder()
        .connect_timeout(Duration::from_secs(connect_timeout_secs))
        .timeout(Duration::from_secs(read_timeout_secs))
        .gzip(true)
        .user_agent(user_agent::default_download_user_agent())
        .build()
}

/// Reads Content-Length; zero-length or missing headers mean "unknown".
fn content_length(response: &reqwest::Response) -> Option<u64> {
    response
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .filter(|len| *len > 0)
}
