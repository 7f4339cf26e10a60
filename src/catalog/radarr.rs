//! Radarr API client implementation
//!
//! Implements the CatalogClient trait against Radarr's v3 REST API.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::{CatalogClient, CatalogError, MediaResult, RootFolder};
use crate::config::ServiceConfig;

/// Radarr movie catalog client
#[derive(Debug)]
pub struct RadarrClient {
    base_url: String,
    api_key: String,
    quality_profile_id: u64,
    http: Client,
}

/// A search hit from `/movie/lookup`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MovieLookup {
    title: String,
    #[serde(default)]
    year: u32,
    #[serde(default)]
    tmdb_id: u64,
    #[serde(default)]
    images: Vec<Image>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Image {
    #[serde(default)]
    cover_type: String,
    #[serde(default)]
    remote_url: Option<String>,
}

/// The subset of a library entry needed for membership checks
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LibraryMovie {
    #[serde(default)]
    tmdb_id: u64,
}

fn poster_url(images: &[Image]) -> Option<String> {
    images
        .iter()
        .find(|i| i.cover_type == "poster")
        .and_then(|i| i.remote_url.clone())
}

impl RadarrClient {
    /// Create a new client from configuration
    ///
    /// Reads the API key from the environment variable named in config.
    pub fn from_config(config: &ServiceConfig) -> Result<Self, CatalogError> {
        let api_key = std::env::var(&config.api_key_env)
            .map_err(|_| CatalogError::Configuration(format!("{} not set", config.api_key_env)))?;

        let http = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(CatalogError::Network)?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            quality_profile_id: config.quality_profile_id,
            http,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v3{}", self.base_url, path)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, CatalogError> {
        debug!(%path, "get_json: called");
        let response = self
            .http
            .get(self.url(path))
            .header("X-Api-Key", &self.api_key)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!(%path, status = status.as_u16(), "get_json: request failed");
            return Err(CatalogError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl CatalogClient for RadarrClient {
    async fn search(&self, title: &str) -> Result<Vec<MediaResult>, CatalogError> {
        debug!(%title, "search: called");
        let hits: Vec<MovieLookup> = self.get_json("/movie/lookup", &[("term", title)]).await?;

        // Backend relevance order is preserved verbatim
        let results = hits
            .into_iter()
            .filter(|m| m.tmdb_id != 0)
            .map(|m| MediaResult {
                remote_id: m.tmdb_id,
                poster: poster_url(&m.images),
                title: m.title,
                year: m.year,
            })
            .collect::<Vec<_>>();

        debug!(count = results.len(), "search: done");
        Ok(results)
    }

    async fn root_folders(&self) -> Result<Vec<RootFolder>, CatalogError> {
        self.get_json("/rootfolder", &[]).await
    }

    async fn in_library(&self, remote_id: u64) -> Result<bool, CatalogError> {
        let library: Vec<LibraryMovie> = self.get_json("/movie", &[]).await?;
        Ok(library.iter().any(|m| m.tmdb_id == remote_id))
    }

    async fn add_to_library(&self, remote_id: u64, path: &str) -> Result<bool, CatalogError> {
        debug!(%remote_id, %path, "add_to_library: called");

        // Fetch the full movie object so the add payload carries the
        // metadata Radarr expects back
        let mut movie: serde_json::Value = self
            .get_json("/movie/lookup/tmdb", &[("tmdbId", remote_id.to_string().as_str())])
            .await?;

        let obj = movie
            .as_object_mut()
            .ok_or_else(|| CatalogError::InvalidResponse("movie lookup did not return an object".to_string()))?;
        obj.insert("qualityProfileId".to_string(), self.quality_profile_id.into());
        obj.insert("rootFolderPath".to_string(), path.into());
        obj.insert("monitored".to_string(), true.into());
        obj.insert(
            "addOptions".to_string(),
            serde_json::json!({ "searchForMovie": true }),
        );

        let response = self
            .http
            .post(self.url("/movie"))
            .header("X-Api-Key", &self.api_key)
            .json(&movie)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            debug!(%remote_id, "add_to_library: added");
            return Ok(true);
        }

        // Radarr answers 400 when the movie cannot be added (e.g. it is
        // already present); that is a rejected add, not a transport failure
        if status.as_u16() == 400 {
            warn!(%remote_id, "add_to_library: rejected by backend");
            return Ok(false);
        }

        let message = response.text().await.unwrap_or_default();
        Err(CatalogError::ApiError {
            status: status.as_u16(),
            message,
        })
    }
}
