//! The streaming fetch primitive consumed by the download cache.

use std::fmt;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream::BoxStream;

use super::DownloadError;

/// An open remote payload: the expected size plus a stream of body chunks.
pub struct MediaStream {
    /// Total bytes the source announced, when known.
    ///
    /// `None` for chunked sources; progress stays unreported for those.
    pub expected_bytes: Option<u64>,
    /// Body chunks in order. The stream ends after the last chunk or the
    /// first error.
    pub chunks: BoxStream<'static, Result<Bytes, DownloadError>>,
}

impl MediaStream {
    /// Creates a stream from parts.
    #[must_use]
    pub fn new(
        expected_bytes: Option<u64>,
        chunks: BoxStream<'static, Result<Bytes, DownloadError>>,
    ) -> Self {
        Self {
            expected_bytes,
            chunks,
        }
    }
}

impl fmt::Debug for MediaStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaStream")
            .field("expected_bytes", &self.expected_bytes)
            .finish_non_exhaustive()
    }
}

/// Opens remote media payloads as byte streams.
///
/// Implemented by [`HttpClient`](super::HttpClient); tests and alternative
/// transports provide their own implementations. Timeouts are the
/// implementation's concern and surface as ordinary errors.
#[async_trait]
pub trait MediaFetcher: Send + Sync {
    /// Opens `url` and returns its body stream.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError`] when the source cannot be opened.
    async fn open(&self, url: &str) -> Result<MediaStream, DownloadError>;
}
