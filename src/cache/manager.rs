//! The download cache manager.
//!
//! [`DownloadCache`] owns the cache directory and the in-memory index of
//! cached records and in-flight transfers. It is a cheap `Clone` handle; all
//! clones share one index.
//!
//! # Concurrency Model
//!
//! - The index sits behind a `std::sync::Mutex` that is never held across an
//!   `.await`, so each mutation is atomic for every reader
//! - Each started acquisition runs on its own Tokio task
//! - There is no limit on simultaneous acquisitions and no cancellation
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use mediacache_core::cache::{AcquireOutcome, CacheLayout, DownloadCache};
//! use mediacache_core::catalog::Catalog;
//! use mediacache_core::download::HttpClient;
//!
//! # async fn example() {
//! let cache = DownloadCache::new(CacheLayout::new("./videos"), Arc::new(HttpClient::new()));
//! cache.reconcile().await;
//!
//! let catalog = Catalog::builtin();
//! if let Some(item) = catalog.get("1") {
//!     if let AcquireOutcome::Started(handle) = cache.acquire(item) {
//!         let outcome = handle.finish().await;
//!         println!("{outcome:?}");
//!     }
//! }
//! println!("cached at {:?}", cache.local_address("1"));
//! # }
//! ```

mod acquire;
mod reconcile;

pub use reconcile::ReconcileReport;

use std::collections::HashMap;
use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, instrument, warn};

use super::error::CacheError;
use super::layout::{CacheLayout, is_valid_id};
use super::record::CachedItemRecord;
use super::transfer::{TransferHandle, TransferState};
use crate::download::MediaFetcher;
use crate::gallery::GalleryRegistrar;

/// Result of an [`acquire`](DownloadCache::acquire) call.
#[derive(Debug)]
pub enum AcquireOutcome {
    /// A transfer was registered and started.
    Started(TransferHandle),
    /// A transfer for this identifier is already running; nothing changed.
    AlreadyTransferring,
    /// The identifier is already cached; nothing changed.
    AlreadyCached,
    /// The identifier cannot be used as a file stem; nothing changed.
    InvalidId,
}

/// Aggregate storage usage of the cache.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StorageSummary {
    /// Number of cached records.
    pub items: usize,
    /// Sum of record size labels in megabytes.
    pub total_mb: f64,
}

/// The authoritative in-memory state: cached records plus active transfers.
#[derive(Debug, Default)]
struct CacheIndex {
    records: HashMap<String, CachedItemRecord>,
    transfers: HashMap<String, TransferState>,
    /// Bumped on every commit and eviction.
    revision: u64,
    /// Revision of the last commit or eviction per identifier.
    touched: HashMap<String, u64>,
}

impl CacheIndex {
    fn touch(&mut self, id: &str) {
        self.revision += 1;
        self.touched.insert(id.to_string(), self.revision);
    }

    /// Swaps the transfer state of `id` for its finished record.
    fn commit(&mut self, id: &str, record: CachedItemRecord) {
        self.transfers.remove(id);
        self.records.insert(id.to_string(), record);
        self.touch(id);
    }

    /// Identifiers committed or evicted after `revision`.
    fn touched_since(&self, revision: u64) -> impl Iterator<Item = &str> {
        self.touched
            .iter()
            .filter(move |(_, at)| **at > revision)
            .map(|(id, _)| id.as_str())
    }
}

struct Inner {
    layout: CacheLayout,
    fetcher: Arc<dyn MediaFetcher>,
    gallery: Option<Arc<dyn GalleryRegistrar>>,
    index: Mutex<CacheIndex>,
}

/// Offline download cache over a single directory.
#[derive(Clone)]
pub struct DownloadCache {
    inner: Arc<Inner>,
}

impl fmt::Debug for DownloadCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DownloadCache")
            .field("layout", &self.inner.layout)
            .field("gallery", &self.inner.gallery.is_some())
            .finish_non_exhaustive()
    }
}

impl DownloadCache {
    /// Creates a cache with an empty index. Call [`reconcile`](Self::reconcile)
    /// before relying on lookups.
    #[must_use]
    pub fn new(layout: CacheLayout, fetcher: Arc<dyn MediaFetcher>) -> Self {
        Self::build(layout, fetcher, None)
    }

    /// Creates a cache that registers finished payloads with `gallery`.
    #[must_use]
    pub fn with_gallery(
        layout: CacheLayout,
        fetcher: Arc<dyn MediaFetcher>,
        gallery: Arc<dyn GalleryRegistrar>,
    ) -> Self {
        Self::build(layout, fetcher, Some(gallery))
    }

    fn build(
        layout: CacheLayout,
        fetcher: Arc<dyn MediaFetcher>,
        gallery: Option<Arc<dyn GalleryRegistrar>>,
    ) -> Self {
        debug!(dir = %layout.dir().display(), "creating download cache");
        Self {
            inner: Arc::new(Inner {
                layout,
                fetcher,
                gallery,
                index: Mutex::new(CacheIndex::default()),
            }),
        }
    }

    /// The directory layout.
    #[must_use]
    pub fn layout(&self) -> &CacheLayout {
        &self.inner.layout
    }

    fn index(&self) -> MutexGuard<'_, CacheIndex> {
        self.inner
            .index
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns true if `id` is cached.
    #[must_use]
    pub fn is_cached(&self, id: &str) -> bool {
        self.index().records.contains_key(id)
    }

    /// Local payload path of a cached identifier.
    #[must_use]
    pub fn local_address(&self, id: &str) -> Option<PathBuf> {
        self.is_cached(id)
            .then(|| self.inner.layout.payload_path(id))
    }

    /// The cached record for `id`.
    #[must_use]
    pub fn record(&self, id: &str) -> Option<CachedItemRecord> {
        self.index().records.get(id).cloned()
    }

    /// All cached records, ordered by identifier.
    #[must_use]
    pub fn records(&self) -> Vec<CachedItemRecord> {
        let mut records: Vec<_> = self.index().records.values().cloned().collect();
        records.sort_by(|a, b| a.item.id.cmp(&b.item.id));
        records
    }

    /// Snapshot of all in-flight transfers.
    #[must_use]
    pub fn transfers(&self) -> HashMap<String, TransferState> {
        self.index().transfers.clone()
    }

    /// Transfer state for `id`, if one is in flight.
    #[must_use]
    pub fn transfer(&self, id: &str) -> Option<TransferState> {
        self.index().transfers.get(id).copied()
    }

    /// Returns true if a transfer for `id` is in flight.
    #[must_use]
    pub fn is_transferring(&self, id: &str) -> bool {
        self.index().transfers.contains_key(id)
    }

    /// Progress percentage of an in-flight transfer.
    #[must_use]
    pub fn progress(&self, id: &str) -> Option<f64> {
        self.transfer(id).map(|state| state.progress)
    }

    /// Sum of all parseable size labels, in megabytes.
    ///
    /// Records still labelled "Unknown" count as zero.
    #[must_use]
    pub fn total_size_mb(&self) -> f64 {
        self.index()
            .records
            .values()
            .filter_map(CachedItemRecord::size_mb)
            .sum()
    }

    /// Item count and total size.
    #[must_use]
    pub fn storage_summary(&self) -> StorageSummary {
        let index = self.index();
        StorageSummary {
            items: index.records.len(),
            total_mb: index
                .records
                .values()
                .filter_map(CachedItemRecord::size_mb)
                .sum(),
        }
    }

    /// Removes the payload and metadata of `id` and drops it from the index.
    ///
    /// Idempotent: absent files and unknown identifiers are not errors. Both
    /// deletions are attempted even if the first fails.
    ///
    /// # Errors
    ///
    /// Returns the first [`CacheError::Io`] raised by a deletion other than
    /// "not found".
    #[instrument(skip(self))]
    pub async fn evict(&self, id: &str) -> Result<(), CacheError> {
        let was_cached = {
            let mut index = self.index();
            index.touch(id);
            index.records.remove(id).is_some()
        };
        if !is_valid_id(id) {
            debug!("ignoring eviction of invalid identifier");
            return Ok(());
        }

        let layout = &self.inner.layout;
        let payload = remove_if_exists(&layout.payload_path(id)).await;
        let metadata = remove_if_exists(&layout.metadata_path(id)).await;

        for result in [&payload, &metadata] {
            if let Err(error) = result {
                warn!(error = %error, "failed to delete cache file");
            }
        }
        info!(
            was_cached,
            payload_removed = matches!(payload, Ok(true)),
            metadata_removed = matches!(metadata, Ok(true)),
            "download evicted"
        );

        payload?;
        metadata?;
        Ok(())
    }

    /// Evicts each identifier in order.
    ///
    /// Returns the identifiers whose eviction reported an error.
    pub async fn evict_many<I, S>(&self, ids: I) -> Vec<(String, CacheError)>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut failures = Vec::new();
        for id in ids {
            let id = id.as_ref();
            if let Err(error) = self.evict(id).await {
                failures.push((id.to_string(), error));
            }
        }
        failures
    }
}

/// Deletes `path`, treating "not found" as success.
///
/// Returns whether a file was removed.
async fn remove_if_exists(path: &Path) -> Result<bool, CacheError> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(CacheError::io(path, e)),
    }
}

/// Creates the cache directory if it is missing.
async fn ensure_dir(dir: &Path) -> Result<(), CacheError> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| CacheError::io(dir, e))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::download::{DownloadError, MediaStream};
    use async_trait::async_trait;
    use tempfile::TempDir;

    struct UnreachableFetcher;

    #[async_trait]
    impl MediaFetcher for UnreachableFetcher {
        async fn open(&self, url: &str) -> Result<MediaStream, DownloadError> {
            Err(DownloadError::stream(url, "offline"))
        }
    }

    fn cache(dir: &Path) -> DownloadCache {
        DownloadCache::new(CacheLayout::new(dir), Arc::new(UnreachableFetcher))
    }

    fn seed(cache: &DownloadCache, id: &str, bytes: u64) {
        let item = Catalog::builtin().get(id).unwrap().clone();
        let record = CachedItemRecord::pending(item).with_size_bytes(bytes);
        cache.index().records.insert(id.to_string(), record);
    }

    #[test]
    fn test_lookup_on_empty_index() {
        let temp = TempDir::new().unwrap();
        let cache = cache(temp.path());
        assert!(!cache.is_cached("1"));
        assert_eq!(cache.local_address("1"), None);
        assert!(cache.records().is_empty());
        assert!(cache.transfers().is_empty());
        assert_eq!(cache.progress("1"), None);
    }

    #[test]
    fn test_local_address_is_payload_path_for_cached_ids() {
        let temp = TempDir::new().unwrap();
        let cache = cache(temp.path());
        seed(&cache, "2", 1024);
        assert_eq!(cache.local_address("2"), Some(temp.path().join("2.mp4")));
        assert_eq!(cache.local_address("3"), None);
    }

    #[test]
    fn test_storage_summary_sums_size_labels() {
        let temp = TempDir::new().unwrap();
        let cache = cache(temp.path());
        seed(&cache, "1", 2 * 1024 * 1024);
        seed(&cache, "2", 1024 * 1024 / 2);
        let item = Catalog::builtin().get("3").unwrap().clone();
        cache
            .index()
            .records
            .insert("3".to_string(), CachedItemRecord::pending(item));

        let summary = cache.storage_summary();
        assert_eq!(summary.items, 3);
        assert_eq!(summary.total_mb, 2.5);
        assert_eq!(cache.total_size_mb(), 2.5);
    }

    #[test]
    fn test_records_are_sorted_by_id() {
        let temp = TempDir::new().unwrap();
        let cache = cache(temp.path());
        seed(&cache, "5", 1);
        seed(&cache, "3", 1);
        let ids: Vec<_> = cache.records().into_iter().map(|r| r.item.id).collect();
        assert_eq!(ids, vec!["3", "5"]);
    }

    #[tokio::test]
    async fn test_evict_removes_files_and_record() {
        let temp = TempDir::new().unwrap();
        let cache = cache(temp.path());
        seed(&cache, "4", 3);
        std::fs::write(temp.path().join("4.mp4"), b"abc").unwrap();
        std::fs::write(temp.path().join("4.json"), b"{}").unwrap();

        cache.evict("4").await.unwrap();

        assert!(!cache.is_cached("4"));
        assert!(!temp.path().join("4.mp4").exists());
        assert!(!temp.path().join("4.json").exists());
    }

    #[tokio::test]
    async fn test_evict_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let cache = cache(temp.path());
        seed(&cache, "4", 3);
        std::fs::write(temp.path().join("4.json"), b"{}").unwrap();

        cache.evict("4").await.unwrap();
        cache.evict("4").await.unwrap();

        assert!(!cache.is_cached("4"));
        assert!(!temp.path().join("4.json").exists());
    }

    #[tokio::test]
    async fn test_evict_invalid_id_touches_nothing() {
        let temp = TempDir::new().unwrap();
        let inner = temp.path().join("videos");
        std::fs::create_dir_all(&inner).unwrap();
        std::fs::write(temp.path().join("secret.json"), b"{}").unwrap();
        let cache = cache(&inner);

        cache.evict("../secret").await.unwrap();

        assert!(temp.path().join("secret.json").exists());
    }

    #[tokio::test]
    async fn test_evict_many_reports_no_failures_for_absent_ids() {
        let temp = TempDir::new().unwrap();
        let cache = cache(temp.path());
        seed(&cache, "1", 1);
        seed(&cache, "2", 1);

        let failures = cache.evict_many(["1", "2", "99"]).await;

        assert!(failures.is_empty());
        assert!(cache.records().is_empty());
    }
}
