//! Reading and writing `<id>.json` metadata files.

use std::io::ErrorKind;

use tracing::debug;

use super::error::CacheError;
use super::layout::CacheLayout;
use super::record::CachedItemRecord;

/// Writes the record's metadata file via a temp file and rename.
///
/// Readers see either the previous file or the new one, never a partial
/// write.
pub(super) async fn write_metadata(
    layout: &CacheLayout,
    record: &CachedItemRecord,
) -> Result<(), CacheError> {
    let path = layout.metadata_path(record.id());
    let tmp_path = layout.metadata_tmp_path(record.id());
    let body = serde_json::to_vec_pretty(record).map_err(|e| CacheError::metadata(&path, e))?;

    if let Err(e) = tokio::fs::write(&tmp_path, &body).await {
        let _ = tokio::fs::remove_file(&tmp_path).await;
        return Err(CacheError::io(tmp_path, e));
    }
    tokio::fs::rename(&tmp_path, &path)
        .await
        .map_err(|e| CacheError::io(&path, e))?;

    debug!(path = %path.display(), size = %record.download_size, "metadata written");
    Ok(())
}

/// Reads the metadata file for `id`.
///
/// Returns `Ok(None)` when the file does not exist.
pub(super) async fn read_metadata(
    layout: &CacheLayout,
    id: &str,
) -> Result<Option<CachedItemRecord>, CacheError> {
    let path = layout.metadata_path(id);
    let raw = match tokio::fs::read(&path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(CacheError::io(path, e)),
    };

    let record: CachedItemRecord =
        serde_json::from_slice(&raw).map_err(|e| CacheError::metadata(&path, e))?;
    if record.id() != id {
        return Err(CacheError::IdMismatch {
            path,
            expected: id.to_string(),
            found: record.id().to_string(),
        });
    }
    Ok(Some(record))
}
