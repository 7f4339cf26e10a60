//! Shared types for catalog backends

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which catalog a conversation is working against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaKind {
    Movie,
    Serie,
}

impl MediaKind {
    /// Transcript key for the nested per-kind message table
    pub fn key(&self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Serie => "serie",
        }
    }

    /// Transcript key for the user-facing label
    pub fn label_key(&self) -> &'static str {
        match self {
            MediaKind::Movie => "Movie",
            MediaKind::Serie => "Serie",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One candidate returned by a catalog search
///
/// Immutable once produced - the conversation only reads from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaResult {
    /// Backend identity (tmdbId for movies, tvdbId for series)
    pub remote_id: u64,
    pub title: String,
    pub year: u32,
    /// Remote poster URL, when the backend has one
    pub poster: Option<String>,
}

/// A library storage location with its available free space
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootFolder {
    pub path: String,
    #[serde(rename = "freeSpace", default)]
    pub free_space: u64,
}

/// One row of the "list all series" output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesOverview {
    pub title: String,
    #[serde(default)]
    pub year: u32,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub monitored: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_keys() {
        assert_eq!(MediaKind::Movie.key(), "movie");
        assert_eq!(MediaKind::Serie.key(), "serie");
        assert_eq!(MediaKind::Movie.label_key(), "Movie");
        assert_eq!(MediaKind::Serie.label_key(), "Serie");
    }

    #[test]
    fn test_root_folder_deserialization() {
        let json = r#"{"path": "/movies", "freeSpace": 1073741824}"#;
        let folder: RootFolder = serde_json::from_str(json).unwrap();
        assert_eq!(folder.path, "/movies");
        assert_eq!(folder.free_space, 1073741824);
    }
}
