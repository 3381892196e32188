//! The offline download cache.
//!
//! This module owns everything stored under the cache directory:
//!
//! - [`CacheLayout`]: where payload and metadata files live
//! - [`CachedItemRecord`]: the persisted metadata of a cached item
//! - [`DownloadCache`]: reconcile, acquire, evict and lookups
//! - [`TransferHandle`]: the progress stream of one acquisition

mod error;
mod layout;
mod manager;
mod metadata;
mod record;
mod transfer;

pub use error::CacheError;
pub use layout::{CacheLayout, DEFAULT_PAYLOAD_EXTENSION, is_valid_id};
pub use manager::{AcquireOutcome, DownloadCache, ReconcileReport, StorageSummary};
pub use record::{CachedItemRecord, UNKNOWN_SIZE_LABEL, format_size_label};
pub use transfer::{TransferEvent, TransferHandle, TransferOutcome, TransferState, progress_percent};
