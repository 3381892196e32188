//! Catalog item type.

use serde::{Deserialize, Serialize};

/// Read-only descriptive record for a piece of media.
///
/// Field names serialize in camelCase; the same shape is embedded in the
/// cache's metadata files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    /// Unique identifier; doubles as the cache file stem.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Display description.
    pub description: String,
    /// Thumbnail image locator.
    pub thumbnail: String,
    /// Human-readable duration label (e.g. `45m`).
    pub duration: String,
    /// Release year.
    pub release_year: u16,
    /// Genre labels.
    pub genres: Vec<String>,
    /// Age rating label (e.g. `PG`).
    pub age_rating: String,
    /// Remote media locator.
    pub video_url: String,
    /// Whether the item may be downloaded for offline viewing.
    pub downloadable: bool,
    /// Shown in the featured rail.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_featured: bool,
    /// Shown in the trending rail.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_trending: bool,
}

impl CatalogItem {
    /// Returns true if the item carries `genre` (exact match).
    #[must_use]
    pub fn has_genre(&self, genre: &str) -> bool {
        self.genres.iter().any(|g| g == genre)
    }

    /// Returns true if the two items share at least one genre.
    #[must_use]
    pub fn shares_genre_with(&self, other: &Self) -> bool {
        self.genres.iter().any(|g| other.has_genre(g))
    }

    /// Case-insensitive substring match on title or description.
    ///
    /// An empty query matches everything.
    #[must_use]
    pub fn matches_query(&self, query: &str) -> bool {
        if query.is_empty() {
            return true;
        }
        let needle = query.to_lowercase();
        self.title.to_lowercase().contains(&needle)
            || self.description.to_lowercase().contains(&needle)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn item() -> CatalogItem {
        CatalogItem {
            id: "42".to_string(),
            title: "Deep Ocean".to_string(),
            description: "Life below the thermocline.".to_string(),
            thumbnail: "https://img.example/42.jpg".to_string(),
            duration: "50m".to_string(),
            release_year: 2020,
            genres: vec!["Documentary".to_string(), "Ocean".to_string()],
            age_rating: "G".to_string(),
            video_url: "https://x/y.mp4".to_string(),
            downloadable: true,
            is_featured: false,
            is_trending: false,
        }
    }

    #[test]
    fn test_catalog_item_serializes_camel_case_without_false_flags() {
        let json = serde_json::to_value(item()).unwrap();
        assert_eq!(json["releaseYear"], 2020);
        assert_eq!(json["ageRating"], "G");
        assert_eq!(json["videoUrl"], "https://x/y.mp4");
        assert!(json.get("isFeatured").is_none());
        assert!(json.get("isTrending").is_none());
    }

    #[test]
    fn test_catalog_item_flags_default_when_missing() {
        let raw = r#"{"id":"1","title":"t","description":"d","thumbnail":"th",
            "duration":"1m","releaseYear":2001,"genres":[],"ageRating":"G",
            "videoUrl":"https://x/1.mp4","downloadable":false}"#;
        let parsed: CatalogItem = serde_json::from_str(raw).unwrap();
        assert!(!parsed.is_featured);
        assert!(!parsed.downloadable);
    }

    #[test]
    fn test_matches_query_is_case_insensitive_on_title_and_description() {
        let item = item();
        assert!(item.matches_query(""));
        assert!(item.matches_query("deep"));
        assert!(item.matches_query("THERMOCLINE"));
        assert!(!item.matches_query("desert"));
    }

    #[test]
    fn test_shares_genre_with() {
        let a = item();
        let mut b = item();
        b.genres = vec!["Ocean".to_string()];
        let mut c = item();
        c.genres = vec!["Space".to_string()];
        assert!(a.shares_genre_with(&b));
        assert!(!a.shares_genre_with(&c));
    }
}
