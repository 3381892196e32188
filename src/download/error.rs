//! Error types for the download module.
//!
//! This module defines structured errors for opening and consuming remote
//! media streams, providing context-rich error messages for debugging and
//! user feedback.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while fetching a media payload.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    #[error("network error downloading {url}: {source}")]
    Network {
        /// The URL that failed to download.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out before completion.
    #[error("timeout downloading {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// HTTP error response (4xx client errors, 5xx server errors).
    #[error("HTTP {status} downloading {url}")]
    HttpStatus {
        /// The URL that returned an error status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// File system error while a fetcher was reading or writing local data.
    #[error("IO error writing to {path}: {source}")]
    Io {
        /// The file path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The provided URL is malformed or invalid.
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The invalid URL string.
        url: String,
    },

    /// The byte stream ended abnormally for a reason not tied to reqwest.
    ///
    /// Used by non-HTTP fetchers (local mirrors, test doubles).
    #[error("stream from {url} failed: {message}")]
    Stream {
        /// The source locator of the stream.
        url: String,
        /// Human-readable failure description.
        message: String,
    },

    /// Authentication or authorization required to access the resource.
    #[error(
        "[AUTH] authentication required for {domain} (HTTP {status}) downloading {url}\n  Suggestion: {suggestion}"
    )]
    AuthRequired {
        /// The URL that requires authentication.
        url: String,
        /// The HTTP status code (401, 403 or 407).
        status: u16,
        /// The domain requiring authentication.
        domain: String,
        /// User-facing suggestion for resolving the auth issue.
        suggestion: &'static str,
    },
}

impl DownloadError {
    /// Creates a network error from a reqwest error.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates a timeout error.
    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: url.into() }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Creates a generic stream failure.
    pub fn stream(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Stream {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Creates an authentication-required error.
    ///
    /// 407 (Proxy Authentication Required) suggests proxy configuration;
    /// 401 and 403 suggest checking that the catalog entry is public.
    pub fn auth_required(url: impl Into<String>, status: u16, domain: impl Into<String>) -> Self {
        let suggestion = if status == 407 {
            "Configure your HTTP proxy settings or check proxy credentials."
        } else {
            "The media source rejected the request; check that the catalog entry is publicly downloadable."
        };
        Self::AuthRequired {
            url: url.into(),
            status,
            domain: domain.into(),
            suggestion,
        }
    }
}

// No `From<reqwest::Error>` / `From<std::io::Error>`: every variant needs a url
// or path that the source error does not carry.
