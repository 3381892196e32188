//! On-disk layout of the cache directory.
//!
//! Each cached identifier owns exactly two files: `<id>.<ext>` (payload) and
//! `<id>.json` (metadata). Metadata rewrites go through `<id>.json.tmp`.

use std::path::{Path, PathBuf};

/// Payload extension used when none is configured.
pub const DEFAULT_PAYLOAD_EXTENSION: &str = "mp4";

const METADATA_SUFFIX: &str = ".json";
const METADATA_TMP_SUFFIX: &str = ".json.tmp";

/// Returns true if `id` can be used as a cache file stem.
///
/// Identifiers must be non-empty ASCII letters, digits, `-` or `_`.
#[must_use]
pub fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

/// Paths of the files belonging to cache identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheLayout {
    dir: PathBuf,
    payload_suffix: String,
}

impl CacheLayout {
    /// Creates a layout for `dir` using [`DEFAULT_PAYLOAD_EXTENSION`].
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_payload_extension(dir, DEFAULT_PAYLOAD_EXTENSION)
    }

    /// Creates a layout with a custom payload extension (leading dot optional).
    #[must_use]
    pub fn with_payload_extension(dir: impl Into<PathBuf>, extension: &str) -> Self {
        let extension = extension.trim_start_matches('.');
        let extension = if extension.is_empty() {
            DEFAULT_PAYLOAD_EXTENSION
        } else {
            extension
        };
        Self {
            dir: dir.into(),
            payload_suffix: format!(".{extension}"),
        }
    }

    /// The cache directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Payload extension without the leading dot.
    #[must_use]
    pub fn payload_extension(&self) -> &str {
        &self.payload_suffix[1..]
    }

    /// `<dir>/<id>.<ext>`
    #[must_use]
    pub fn payload_path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{id}{}", self.payload_suffix))
    }

    /// `<dir>/<id>.json`
    #[must_use]
    pub fn metadata_path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{id}{METADATA_SUFFIX}"))
    }

    /// `<dir>/<id>.json.tmp`
    #[must_use]
    pub fn metadata_tmp_path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{id}{METADATA_TMP_SUFFIX}"))
    }

    /// Derives the identifier a directory entry belongs to.
    ///
    /// Only payload and metadata files count; the identifier is the name up
    /// to the first `.`. Returns `None` for unrelated files and invalid ids.
    #[must_use]
    pub fn identifier_from_file_name<'a>(&self, file_name: &'a str) -> Option<&'a str> {
        if !file_name.ends_with(METADATA_SUFFIX) && !file_name.ends_with(&self.payload_suffix) {
            return None;
        }
        let id = file_name.split('.').next()?;
        is_valid_id(id).then_some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_are_deterministic() {
        let layout = CacheLayout::new("/data/videos");
        assert_eq!(layout.payload_path("42"), PathBuf::from("/data/videos/42.mp4"));
        assert_eq!(layout.metadata_path("42"), PathBuf::from("/data/videos/42.json"));
        assert_eq!(
            layout.metadata_tmp_path("42"),
            PathBuf::from("/data/videos/42.json.tmp")
        );
    }

    #[test]
    fn test_custom_extension_strips_leading_dot() {
        let layout = CacheLayout::with_payload_extension("/c", ".webm");
        assert_eq!(layout.payload_extension(), "webm");
        assert_eq!(layout.payload_path("a"), PathBuf::from("/c/a.webm"));

        let fallback = CacheLayout::with_payload_extension("/c", "");
        assert_eq!(fallback.payload_extension(), DEFAULT_PAYLOAD_EXTENSION);
    }

    #[test]
    fn test_identifier_from_file_name() {
        let layout = CacheLayout::new("/c");
        assert_eq!(layout.identifier_from_file_name("7.json"), Some("7"));
        assert_eq!(layout.identifier_from_file_name("7.mp4"), Some("7"));
        assert_eq!(layout.identifier_from_file_name("a.b.json"), Some("a"));
        assert_eq!(layout.identifier_from_file_name("7.json.tmp"), None);
        assert_eq!(layout.identifier_from_file_name("notes.txt"), None);
        assert_eq!(layout.identifier_from_file_name(".json"), None);
    }

    #[test]
    fn test_is_valid_id() {
        assert!(is_valid_id("42"));
        assert!(is_valid_id("ep-01_final"));
        assert!(!is_valid_id(""));
        assert!(!is_valid_id("../etc"));
        assert!(!is_valid_id("a/b"));
        assert!(!is_valid_id("a.b"));
    }
}
