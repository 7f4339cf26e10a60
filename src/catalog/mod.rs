//! Catalog backend module
//!
//! One CatalogClient trait, two implementations: Radarr for movies and
//! Sonarr for series. Which one a conversation talks to is decided once
//! from the session's MediaKind.

pub mod client;
mod error;
mod radarr;
mod sonarr;
mod types;

pub use client::{CatalogClient, SeriesLister};
pub use error::CatalogError;
pub use radarr::RadarrClient;
pub use sonarr::SonarrClient;
pub use types::{MediaKind, MediaResult, RootFolder, SeriesOverview};
