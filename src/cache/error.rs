//! Error types for the download cache.

use std::path::PathBuf;

use thiserror::Error;

use crate::download::DownloadError;

/// Errors raised inside cache operations.
///
/// Acquisition and reconciliation never return these to callers directly:
/// acquisition reports them through [`TransferEvent::Failed`](super::TransferEvent)
/// and reconciliation logs them and skips the identifier. Eviction returns
/// them after both deletions were attempted.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Filesystem failure on a cache file or the cache directory.
    #[error("cache IO error at {path}: {source}")]
    Io {
        /// Path involved in the failure.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// A metadata file could not be encoded or decoded.
    #[error("malformed metadata {path}: {source}")]
    Metadata {
        /// Metadata file path.
        path: PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// A metadata file describes a different identifier than its file name.
    #[error("metadata {path} describes id {found}, expected {expected}")]
    IdMismatch {
        /// Metadata file path.
        path: PathBuf,
        /// Identifier derived from the file name.
        expected: String,
        /// Identifier stored in the file.
        found: String,
    },

    /// The payload transfer failed.
    #[error(transparent)]
    Download(#[from] DownloadError),
}

impl CacheError {
    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates a metadata encoding/decoding error.
    pub fn metadata(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Metadata {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_error_io_display_names_path() {
        let error = CacheError::io(
            "/cache/videos/1.json",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(error.to_string().contains("/cache/videos/1.json"));
    }

    #[test]
    fn test_cache_error_download_is_transparent() {
        let error = CacheError::from(DownloadError::http_status("https://x/y.mp4", 503));
        assert_eq!(error.to_string(), "HTTP 503 downloading https://x/y.mp4");
    }
}
