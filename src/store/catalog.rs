//! JSON catalog files
//!
//! A catalog is a complete snapshot of the game data: users, access tokens,
//! categories, puzzles, and the progress/high-score tables. The CLI loads one
//! into a [`MemoryStore`](super::MemoryStore) and writes the mutable tables
//! back after a submission.

use super::embedded::SAMPLE_CATALOG;
use crate::core::{Category, CategoryId, ProgressRecord, Puzzle, UserId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid catalog {origin}: {source}")]
    Parse {
        origin: String,
        source: serde_json::Error,
    },
    #[error("failed to serialize catalog: {0}")]
    Serialize(serde_json::Error),
}

/// One row of the high-score table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub user: UserId,
    pub category: CategoryId,
    pub high_score: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub users: Vec<UserId>,
    /// Bearer token -> user
    #[serde(default)]
    pub tokens: BTreeMap<String, UserId>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub puzzles: Vec<Puzzle>,
    #[serde(default)]
    pub progress: Vec<ProgressRecord>,
    #[serde(default)]
    pub high_scores: Vec<HighScoreEntry>,
}

impl Catalog {
    /// Parse a catalog from JSON text
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Parse` if the text is not a valid catalog.
    pub fn from_json(json: &str, origin: &str) -> Result<Self, CatalogError> {
        serde_json::from_str(json).map_err(|source| CatalogError::Parse {
            origin: origin.to_string(),
            source,
        })
    }

    /// The catalog compiled into the binary
    ///
    /// # Errors
    ///
    /// Returns an error only if the embedded file is malformed.
    pub fn sample() -> Result<Self, CatalogError> {
        Self::from_json(SAMPLE_CATALOG, "<sample>")
    }

    /// Load a catalog file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content, &path.display().to_string())
    }

    /// Write the catalog as pretty-printed JSON
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save(&self, path: &Path) -> Result<(), CatalogError> {
        let content = serde_json::to_string_pretty(self).map_err(CatalogError::Serialize)?;
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| CatalogError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(path, content).map_err(|source| CatalogError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Puzzles of one category, ascending by position
    #[must_use]
    pub fn puzzles_in(&self, category: CategoryId) -> Vec<&Puzzle> {
        let mut puzzles: Vec<&Puzzle> = self
            .puzzles
            .iter()
            .filter(|puzzle| puzzle.category == category)
            .collect();
        puzzles.sort_by_key(|puzzle| puzzle.position);
        puzzles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_catalog_parses() {
        let catalog = Catalog::sample().unwrap();
        assert!(!catalog.categories.is_empty());
        assert!(!catalog.puzzles.is_empty());
        assert!(!catalog.tokens.is_empty());
    }

    #[test]
    fn missing_tables_default_to_empty() {
        let catalog = Catalog::from_json(r#"{"users": ["u1"]}"#, "inline").unwrap();
        assert_eq!(catalog.users, vec![UserId::new("u1")]);
        assert!(catalog.puzzles.is_empty());
        assert!(catalog.tokens.is_empty());
    }

    #[test]
    fn parse_error_names_origin() {
        let err = Catalog::from_json("{not json", "broken.json").unwrap_err();
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn puzzles_in_sorts_by_position() {
        let catalog = Catalog::sample().unwrap();
        let category = catalog.categories[0].id;
        let positions: Vec<u32> = catalog
            .puzzles_in(category)
            .iter()
            .map(|puzzle| puzzle.position)
            .collect();
        let mut sorted = positions.clone();
        sorted.sort_unstable();
        assert_eq!(positions, sorted);
        assert!(!positions.is_empty());
    }

    #[test]
    fn save_and_load() {
        let dir = std::env::temp_dir().join(format!("acronym-catalog-{}", std::process::id()));
        let path = dir.join("catalog.json");
        let catalog = Catalog::sample().unwrap();

        catalog.save(&path).unwrap();
        let loaded = Catalog::load(&path).unwrap();
        assert_eq!(loaded, catalog);

        fs::remove_dir_all(&dir).unwrap();
    }
}
