//! Best-effort registration of finished downloads with a media gallery.
//!
//! The cache calls the registrar once per successful acquisition. Failures
//! are logged by the caller and never affect the cache state.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::cache::CachedItemRecord;

/// Default album name for registered downloads.
pub const DEFAULT_ALBUM_NAME: &str = "Offline Downloads";

/// Errors produced while registering a payload with a gallery.
#[derive(Debug, Error)]
pub enum GalleryError {
    /// Filesystem failure while creating the album or copying the payload.
    #[error("gallery IO error at {path}: {source}")]
    Io {
        /// Path involved in the failure.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The payload path has no file name to register under.
    #[error("payload path has no file name: {path}")]
    UnnamedPayload {
        /// The offending path.
        path: PathBuf,
    },
}

/// Receives finished payloads.
#[async_trait]
pub trait GalleryRegistrar: Send + Sync {
    /// Registers the payload at `payload` for `record`.
    ///
    /// # Errors
    ///
    /// Returns [`GalleryError`]; callers treat it as non-fatal.
    async fn register(
        &self,
        payload: &Path,
        record: &CachedItemRecord,
    ) -> Result<PathBuf, GalleryError>;
}

/// Gallery that copies payloads into an album directory.
///
/// Layout: `<root>/<album>/<payload file name>`.
#[derive(Debug, Clone)]
pub struct AlbumGallery {
    root: PathBuf,
    album: String,
}

impl AlbumGallery {
    /// Creates a gallery rooted at `root` using [`DEFAULT_ALBUM_NAME`].
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            album: DEFAULT_ALBUM_NAME.to_string(),
        }
    }

    /// Overrides the album name.
    #[must_use]
    pub fn with_album(mut self, album: impl Into<String>) -> Self {
        self.album = album.into();
        self
    }

    /// Directory that receives copied payloads.
    #[must_use]
    pub fn album_dir(&self) -> PathBuf {
        self.root.join(&self.album)
    }
}

#[async_trait]
impl GalleryRegistrar for AlbumGallery {
    #[instrument(skip(self, record), fields(id = %record.item.id))]
    async fn register(
        &self,
        payload: &Path,
        record: &CachedItemRecord,
    ) -> Result<PathBuf, GalleryError> {
        let file_name = payload
            .file_name()
            .ok_or_else(|| GalleryError::UnnamedPayload {
                path: payload.to_path_buf(),
            })?;
        let album_dir = self.album_dir();
        tokio::fs::create_dir_all(&album_dir)
            .await
            .map_err(|source| GalleryError::Io {
                path: album_dir.clone(),
                source,
            })?;

        let target = album_dir.join(file_name);
        tokio::fs::copy(payload, &target)
            .await
            .map_err(|source| GalleryError::Io {
                path: target.clone(),
                source,
            })?;

        debug!(target = %target.display(), "payload added to album");
        Ok(target)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use tempfile::TempDir;

    fn record() -> CachedItemRecord {
        CachedItemRecord::pending(Catalog::builtin().get("1").unwrap().clone())
    }

    #[tokio::test]
    async fn test_album_gallery_copies_payload_into_album() {
        let temp = TempDir::new().unwrap();
        let payload = temp.path().join("1.mp4");
        std::fs::write(&payload, b"frames").unwrap();

        let gallery = AlbumGallery::new(temp.path().join("gallery")).with_album("Saved");
        let target = gallery.register(&payload, &record()).await.unwrap();

        assert_eq!(target, temp.path().join("gallery").join("Saved").join("1.mp4"));
        assert_eq!(std::fs::read(target).unwrap(), b"frames");
    }

    #[tokio::test]
    async fn test_album_gallery_missing_payload_is_io_error() {
        let temp = TempDir::new().unwrap();
        let gallery = AlbumGallery::new(temp.path());
        let result = gallery
            .register(&temp.path().join("absent.mp4"), &record())
            .await;
        assert!(matches!(result, Err(GalleryError::Io { .. })));
    }

    #[test]
    fn test_album_gallery_default_album_name() {
        let gallery = AlbumGallery::new("/media");
        assert_eq!(
            gallery.album_dir(),
            PathBuf::from("/media").join(DEFAULT_ALBUM_NAME)
        );
    }
}
