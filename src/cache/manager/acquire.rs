//! Acquisition: registering a transfer and streaming the payload to disk.

use std::path::Path;

use futures_util::StreamExt;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tokio::sync::mpsc;
use tracing::{Instrument, debug, info, info_span, warn};

use super::{AcquireOutcome, DownloadCache, ensure_dir};
use crate::cache::error::CacheError;
use crate::cache::layout::is_valid_id;
use crate::cache::metadata::write_metadata;
use crate::cache::record::CachedItemRecord;
use crate::cache::transfer::{TransferEvent, TransferHandle, TransferState, progress_percent};
use crate::catalog::CatalogItem;
use crate::download::{DownloadError, MediaStream};

type EventSender = mpsc::UnboundedSender<TransferEvent>;

impl DownloadCache {
    /// Starts downloading `item` unless it is cached or already in flight.
    ///
    /// The precondition check and transfer registration happen under one
    /// lock, so two concurrent calls for the same identifier start at most one
    /// transfer. The transfer itself runs on a spawned task; observe it
    /// through the returned [`TransferHandle`].
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn acquire(&self, item: &CatalogItem) -> AcquireOutcome {
        if !is_valid_id(&item.id) {
            warn!(id = %item.id, "refusing to acquire invalid identifier");
            return AcquireOutcome::InvalidId;
        }
        let runtime = tokio::runtime::Handle::current();

        {
            let mut index = self.index();
            if index.transfers.contains_key(&item.id) {
                debug!(id = %item.id, "transfer already in flight");
                return AcquireOutcome::AlreadyTransferring;
            }
            if index.records.contains_key(&item.id) {
                debug!(id = %item.id, "already cached");
                return AcquireOutcome::AlreadyCached;
            }
            index
                .transfers
                .insert(item.id.clone(), TransferState::started());
        }

        let (events, receiver) = mpsc::unbounded_channel();
        let span = info_span!("transfer", id = %item.id);
        let task = runtime.spawn(run_transfer(self.clone(), item.clone(), events).instrument(span));

        info!(id = %item.id, url = %item.video_url, "transfer started");
        AcquireOutcome::Started(TransferHandle::new(item.id.clone(), receiver, task))
    }

    /// Advances the recorded progress of `id`.
    ///
    /// Returns the new percentage when it increased.
    fn advance_progress(&self, id: &str, percent: f64) -> Option<f64> {
        self.index()
            .transfers
            .get_mut(id)
            .and_then(|state| state.advance(percent))
    }

    async fn register_with_gallery(&self, record: &CachedItemRecord) {
        let Some(gallery) = self.inner.gallery.as_ref() else {
            return;
        };
        let payload = self.inner.layout.payload_path(record.id());
        match gallery.register(&payload, record).await {
            Ok(target) => debug!(target = %target.display(), "registered with gallery"),
            Err(error) => warn!(error = %error, "gallery registration failed"),
        }
    }
}

/// Clears the transfer state when the task ends without committing.
struct TransferGuard<'a> {
    cache: &'a DownloadCache,
    id: &'a str,
    armed: bool,
}

impl<'a> TransferGuard<'a> {
    fn new(cache: &'a DownloadCache, id: &'a str) -> Self {
        Self {
            cache,
            id,
            armed: true,
        }
    }

    /// Swaps the transfer state for the finished record in one step.
    fn commit(mut self, record: CachedItemRecord) {
        self.cache.index().commit(self.id, record);
        self.armed = false;
    }
}

impl Drop for TransferGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.cache.index().transfers.remove(self.id);
        }
    }
}

async fn run_transfer(cache: DownloadCache, item: CatalogItem, events: EventSender) {
    let id = item.id.clone();
    let guard = TransferGuard::new(&cache, &id);

    match fetch_to_disk(&cache, item, &events).await {
        Ok(record) => {
            guard.commit(record.clone());
            info!(size = %record.download_size, "transfer completed");
            cache.register_with_gallery(&record).await;
            let _ = events.send(TransferEvent::Completed(record));
        }
        Err(error) => {
            drop(guard);
            warn!(error = %error, "transfer failed");
            let _ = events.send(TransferEvent::Failed {
                reason: error.to_string(),
            });
        }
    }
}

/// Writes pending metadata, streams the payload, then rewrites metadata
/// with the measured size.
async fn fetch_to_disk(
    cache: &DownloadCache,
    item: CatalogItem,
    events: &EventSender,
) -> Result<CachedItemRecord, CacheError> {
    let layout = &cache.inner.layout;
    ensure_dir(layout.dir()).await?;

    let pending = CachedItemRecord::pending(item);
    write_metadata(layout, &pending).await?;

    let id = pending.item.id.clone();
    let url = pending.item.video_url.clone();
    let stream = cache.inner.fetcher.open(&url).await?;
    debug!(expected_bytes = ?stream.expected_bytes, "source opened");

    let payload_path = layout.payload_path(&id);
    let written = stream_to_file(&payload_path, stream, &url, |written, expected| {
        if let Some(percent) = progress_percent(written, expected)
            .and_then(|percent| cache.advance_progress(&id, percent))
        {
            let _ = events.send(TransferEvent::Progress(percent));
        }
    })
    .await?;

    let size = tokio::fs::metadata(&payload_path)
        .await
        .map_err(|e| CacheError::io(&payload_path, e))?
        .len();
    debug!(written, size, "payload written");

    let record = pending.with_size_bytes(size);
    write_metadata(layout, &record).await?;
    Ok(record)
}

/// Streams the source to `path`, reporting cumulative bytes after each
/// chunk. Returns the total bytes written.
async fn stream_to_file<F>(
    path: &Path,
    source: MediaStream,
    url: &str,
    mut on_chunk: F,
) -> Result<u64, DownloadError>
where
    F: FnMut(u64, Option<u64>),
{
    let file = File::create(path)
        .await
        .map_err(|e| DownloadError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    let expected = source.expected_bytes;
    let mut chunks = source.chunks;
    let mut bytes_written: u64 = 0;

    while let Some(chunk) = chunks.next().await {
        let chunk = chunk?;
        writer
            .write_all(&chunk)
            .await
            .map_err(|e| DownloadError::io(path, e))?;
        bytes_written += chunk.len() as u64;
        on_chunk(bytes_written, expected);
    }

    writer
        .flush()
        .await
        .map_err(|e| DownloadError::io(path, e))?;
    tracing::trace!(url, bytes_written, "stream drained");
    Ok(bytes_written)
}
