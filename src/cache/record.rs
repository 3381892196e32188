//! Persisted cache record.

use serde::{Deserialize, Serialize};

use crate::catalog::CatalogItem;

/// Size label written before the payload size is known.
pub const UNKNOWN_SIZE_LABEL: &str = "Unknown";

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// A downloaded item: the catalog fields plus cache bookkeeping.
///
/// Serialized flat, so the metadata file is the catalog item's JSON with
/// `downloadSize` and `isDownloaded` added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedItemRecord {
    /// Copy of the catalog entry.
    #[serde(flatten)]
    pub item: CatalogItem,
    /// Human-readable payload size (`"12.3 MB"`), or [`UNKNOWN_SIZE_LABEL`].
    pub download_size: String,
    /// Downloaded marker.
    pub is_downloaded: bool,
}

impl CachedItemRecord {
    /// The record written before the payload transfer starts.
    #[must_use]
    pub fn pending(item: CatalogItem) -> Self {
        Self {
            item,
            download_size: UNKNOWN_SIZE_LABEL.to_string(),
            is_downloaded: true,
        }
    }

    /// Returns the record with its size label set from a byte count.
    #[must_use]
    pub fn with_size_bytes(mut self, bytes: u64) -> Self {
        self.download_size = format_size_label(bytes);
        self
    }

    /// The item identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.item.id
    }

    /// Numeric megabytes parsed from the size label, if it has one.
    #[must_use]
    pub fn size_mb(&self) -> Option<f64> {
        self.download_size
            .strip_suffix("MB")
            .and_then(|n| n.trim().parse::<f64>().ok())
            .filter(|n| n.is_finite())
    }
}

/// Formats a byte count as megabytes with one decimal place.
///
/// ```
/// use mediacache_core::cache::format_size_label;
///
/// assert_eq!(format_size_label(10 * 1024 * 1024), "10.0 MB");
/// ```
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_size_label(bytes: u64) -> String {
    format!("{:.1} MB", bytes as f64 / BYTES_PER_MB)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    fn item() -> CatalogItem {
        Catalog::builtin().get("3").unwrap().clone()
    }

    #[test]
    fn test_pending_record_claims_downloaded_with_unknown_size() {
        let record = CachedItemRecord::pending(item());
        assert!(record.is_downloaded);
        assert_eq!(record.download_size, UNKNOWN_SIZE_LABEL);
        assert_eq!(record.size_mb(), None);
    }

    #[test]
    fn test_format_size_label_rounds_to_one_decimal() {
        assert_eq!(format_size_label(0), "0.0 MB");
        assert_eq!(format_size_label(1_572_864), "1.5 MB");
        assert_eq!(format_size_label(10 * 1024 * 1024), "10.0 MB");
    }

    #[test]
    fn test_size_mb_parses_label() {
        let record = CachedItemRecord::pending(item()).with_size_bytes(3 * 1024 * 1024);
        assert_eq!(record.size_mb(), Some(3.0));
    }

    #[test]
    fn test_record_json_is_flat_camel_case() {
        let record = CachedItemRecord::pending(item()).with_size_bytes(1024 * 1024);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["id"], "3");
        assert_eq!(json["videoUrl"], record.item.video_url.as_str());
        assert_eq!(json["downloadSize"], "1.0 MB");
        assert_eq!(json["isDownloaded"], true);
        assert!(json.get("item").is_none());

        let back: CachedItemRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }
}
