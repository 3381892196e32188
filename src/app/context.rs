//! Shared runtime context built after CLI/config handling.

use std::sync::Arc;

use anyhow::{Context, Result};
use mediacache_core::{AlbumGallery, CacheLayout, Catalog, DownloadCache, HttpClient};
use tracing::debug;

use crate::app::config_runtime::RuntimeSettings;

/// Holds the catalog and the reconciled cache so command handlers take one
/// argument instead of several.
pub(crate) struct RunContext {
    pub(crate) catalog: Catalog,
    pub(crate) cache: DownloadCache,
    pub(crate) show_progress: bool,
}

impl RunContext {
    /// Loads the catalog, builds the cache and reconciles it with disk.
    pub(crate) async fn build(settings: &RuntimeSettings, show_progress: bool) -> Result<Self> {
        let catalog = match &settings.catalog_file {
            Some(path) => Catalog::from_json_file(path)
                .with_context(|| format!("Failed to load catalog '{}'", path.display()))?,
            None => Catalog::builtin(),
        };

        let layout =
            CacheLayout::with_payload_extension(&settings.cache_dir, &settings.payload_extension);
        let fetcher = Arc::new(HttpClient::new_with_timeouts(
            settings.timeouts.connect_secs,
            settings.timeouts.read_secs,
        ));
        let cache = match &settings.gallery_dir {
            Some(root) => DownloadCache::with_gallery(
                layout,
                fetcher,
                Arc::new(AlbumGallery::new(root).with_album(settings.album_name.clone())),
            ),
            None => DownloadCache::new(layout, fetcher),
        };

        let report = cache.reconcile().await;
        debug!(
            catalog_items = catalog.len(),
            loaded = report.loaded,
            skipped = report.skipped,
            "runtime context ready"
        );

        Ok(Self {
            catalog,
            cache,
            show_progress,
        })
    }
}
