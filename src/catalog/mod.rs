//! Read-only media catalog.
//!
//! The catalog is an ordered, in-memory list of [`CatalogItem`]s. The cache
//! only reads from it; the CLI uses it to look up items by identifier and to
//! browse by genre or free-text search.

mod builtin;
mod item;

pub use item::CatalogItem;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, instrument};

/// Errors loading a catalog from disk.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog file could not be read.
    #[error("failed to read catalog {path}: {source}")]
    Io {
        /// Catalog file path.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The catalog file is not a JSON array of catalog items.
    #[error("failed to parse catalog {path}: {source}")]
    Parse {
        /// Catalog file path.
        path: PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// Two items share an identifier.
    #[error("duplicate catalog identifier: {id}")]
    DuplicateId {
        /// The repeated identifier.
        id: String,
    },
}

/// Ordered, read-only collection of catalog items.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: Vec<CatalogItem>,
}

impl Catalog {
    /// The catalog bundled with the application.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            items: builtin::builtin_items(),
        }
    }

    /// Builds a catalog from items, rejecting duplicate identifiers.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateId`] if two items share an id.
    pub fn from_items(items: Vec<CatalogItem>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for item in &items {
            if !seen.insert(item.id.as_str()) {
                return Err(CatalogError::DuplicateId {
                    id: item.id.clone(),
                });
            }
        }
        Ok(Self { items })
    }

    /// Loads a catalog from a JSON array file.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] on read, parse, or duplicate-id failures.
    #[instrument(fields(path = %path.display()))]
    pub fn from_json_file(path: &Path) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let items: Vec<CatalogItem> =
            serde_json::from_str(&raw).map_err(|source| CatalogError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        debug!(items = items.len(), "catalog loaded");
        Self::from_items(items)
    }

    /// All items in catalog order.
    #[must_use]
    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the catalog has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Looks up an item by identifier.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&CatalogItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Items carrying `genre`.
    pub fn by_genre<'a>(&'a self, genre: &'a str) -> impl Iterator<Item = &'a CatalogItem> + 'a {
        self.items.iter().filter(move |item| item.has_genre(genre))
    }

    /// Distinct genres in first-seen order.
    #[must_use]
    pub fn genres(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.items
            .iter()
            .flat_map(|item| item.genres.iter())
            .filter(|genre| seen.insert(genre.as_str()))
            .map(String::as_str)
            .collect()
    }

    /// Items matching a free-text query and, optionally, a genre.
    ///
    /// Both filters must match; an empty query and `None` genre return
    /// everything.
    #[must_use]
    pub fn search(&self, query: &str, genre: Option<&str>) -> Vec<&CatalogItem> {
        self.items
            .iter()
            .filter(|item| item.matches_query(query))
            .filter(|item| genre.is_none_or(|g| item.has_genre(g)))
            .collect()
    }

    /// Up to `limit` other items sharing a genre with `id`.
    ///
    /// Returns an empty list for unknown identifiers.
    #[must_use]
    pub fn related(&self, id: &str, limit: usize) -> Vec<&CatalogItem> {
        let Some(anchor) = self.get(id) else {
            return Vec::new();
        };
        self.items
            .iter()
            .filter(|item| item.id != anchor.id && item.shares_genre_with(anchor))
            .take(limit)
            .collect()
    }

    /// Items flagged as featured.
    pub fn featured(&self) -> impl Iterator<Item = &CatalogItem> {
        self.items.iter().filter(|item| item.is_featured)
    }

    /// Items flagged as trending.
    pub fn trending(&self) -> impl Iterator<Item = &CatalogItem> {
        self.items.iter().filter(|item| item.is_trending)
    }
}
