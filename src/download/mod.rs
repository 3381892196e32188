//! Streaming fetch layer for remote media payloads.
//!
//! This module provides the [`MediaFetcher`] abstraction the cache consumes
//! and its HTTP implementation.
//!
//! # Features
//!
//! - Streaming bodies (memory-efficient for large video files)
//! - Expected size taken from Content-Length when the server sends one
//! - Configurable timeouts (30s connect, 5min read by default)
//! - Structured error types with full context
//!
//! # Example
//!
//! ```no_run
//! use futures_util::StreamExt;
//! use mediacache_core::download::{HttpClient, MediaFetcher};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::new();
//! let mut stream = client.open("https://example.com/video.mp4").await?;
//! while let Some(chunk) = stream.chunks.next().await {
//!     println!("received {} bytes", chunk?.len());
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod constants;
mod error;
mod fetcher;

pub use client::HttpClient;
pub use constants::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS};
pub use error::DownloadError;
pub use fetcher::{MediaFetcher, MediaStream};
