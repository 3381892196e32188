//! Startup reconciliation of the index against the cache directory.

use std::collections::{BTreeSet, HashMap};
use std::io::ErrorKind;

use tracing::{debug, info, instrument, warn};

use super::{DownloadCache, ensure_dir};
use crate::cache::error::CacheError;
use crate::cache::metadata::read_metadata;
use crate::cache::record::CachedItemRecord;

/// Counts from one reconciliation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Identifiers surfaced as cached.
    pub loaded: usize,
    /// Identifiers seen on disk but not surfaced (orphans, malformed
    /// metadata, unreadable entries, active transfers).
    pub skipped: usize,
}

impl DownloadCache {
    /// Rebuilds the cached-record set from the cache directory, creating the
    /// directory if it is missing.
    ///
    /// An identifier is surfaced only if both its metadata and payload files
    /// exist and the metadata parses. Orphans are neither surfaced nor
    /// deleted. Identifiers with an active transfer are left alone. Errors are
    /// logged, never returned.
    #[instrument(skip(self), fields(dir = %self.inner.layout.dir().display()))]
    pub async fn reconcile(&self) -> ReconcileReport {
        let since = self.index().revision;
        if let Err(error) = ensure_dir(self.inner.layout.dir()).await {
            warn!(error = %error, "could not create cache directory");
        }

        let ids = match self.scan_identifiers().await {
            Ok(ids) => ids,
            Err(error) => {
                warn!(error = %error, "cache directory unreadable; starting empty");
                self.replace_records(HashMap::new(), since);
                return ReconcileReport::default();
            }
        };

        let mut records = HashMap::new();
        let mut report = ReconcileReport::default();
        for id in ids {
            if self.is_transferring(&id) {
                debug!(id, "skipping identifier with active transfer");
                report.skipped += 1;
                continue;
            }
            match self.load_entry(&id).await {
                Ok(Some(record)) => {
                    records.insert(id, record);
                    report.loaded += 1;
                }
                Ok(None) => report.skipped += 1,
                Err(error) => {
                    warn!(id, error = %error, "skipping unreadable cache entry");
                    report.skipped += 1;
                }
            }
        }

        self.replace_records(records, since);
        info!(loaded = report.loaded, skipped = report.skipped, "cache reconciled");
        report
    }

    /// Distinct identifiers derived from payload and metadata file names.
    async fn scan_identifiers(&self) -> Result<BTreeSet<String>, CacheError> {
        let dir = self.inner.layout.dir();
        let mut entries = match tokio::fs::read_dir(dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("cache directory does not exist yet");
                return Ok(BTreeSet::new());
            }
            Err(e) => return Err(CacheError::io(dir, e)),
        };

        let mut ids = BTreeSet::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| CacheError::io(dir, e))?
        {
            let file_name = entry.file_name();
            let Some(file_name) = file_name.to_str() else {
                continue;
            };
            if let Some(id) = self.inner.layout.identifier_from_file_name(file_name) {
                ids.insert(id.to_string());
            }
        }
        Ok(ids)
    }

    /// Loads one identifier, returning `None` for orphans.
    async fn load_entry(&self, id: &str) -> Result<Option<CachedItemRecord>, CacheError> {
        let Some(record) = read_metadata(&self.inner.layout, id).await? else {
            debug!(id, "payload without metadata");
            return Ok(None);
        };

        let payload = self.inner.layout.payload_path(id);
        match tokio::fs::try_exists(&payload).await {
            Ok(true) => Ok(Some(record)),
            Ok(false) => {
                debug!(id, "metadata without payload");
                Ok(None)
            }
            Err(e) => Err(CacheError::io(payload, e)),
        }
    }

    /// Replaces the record set with the scan result.
    ///
    /// Identifiers committed or evicted after `since` keep their current
    /// index state, and identifiers with an in-flight transfer are never
    /// surfaced.
    fn replace_records(&self, mut records: HashMap<String, CachedItemRecord>, since: u64) {
        let mut index = self.index();
        for id in index.touched_since(since) {
            match index.records.get(id) {
                Some(current) => records.insert(id.to_string(), current.clone()),
                None => records.remove(id),
            };
        }
        records.retain(|id, _| !index.transfers.contains_key(id));
        index.records = records;
    }
}
