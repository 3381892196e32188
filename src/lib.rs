//! Mediacache Core Library
//!
//! This library provides an offline download cache for a media catalog:
//! remote video payloads are streamed to a local directory together with a
//! JSON metadata file, and the set of cached items survives restarts.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`cache`] - Reconcile, acquire, evict and look up cached items
//! - [`catalog`] - Read-only catalog of downloadable media
//! - [`download`] - HTTP streaming fetcher and download errors
//! - [`gallery`] - Best-effort registration of finished payloads

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cache;
pub mod catalog;
pub mod download;
pub mod gallery;

mod user_agent;

// Re-export commonly used types
pub use cache::{
    AcquireOutcome, CacheError, CacheLayout, CachedItemRecord, DownloadCache, ReconcileReport,
    StorageSummary, TransferEvent, TransferHandle, TransferOutcome, TransferState,
};
pub use catalog::{Catalog, CatalogError, CatalogItem};
pub use download::{DownloadError, HttpClient, MediaFetcher, MediaStream};
pub use gallery::{AlbumGallery, GalleryError, GalleryRegistrar};
